use std::cmp::Ordering;
use std::fmt::Display;

/// A coordinate type an interval index can be built over.
///
/// The index needs a *total* order: every ordering decision it makes (the
/// build-time sort, augmentation maxima, query pruning) goes through
/// [`cmp_total`](Scalar::cmp_total) so that all seven key types behave
/// identically. For the integer types this is plain [`Ord`]; for `f32`/`f64`
/// it is [`f64::total_cmp`], which orders NaN above every number and `-0.0`
/// below `0.0`. Under that order NaN can never be a valid begin position
/// (nothing is greater), so float indexes stay well-formed without any
/// special-casing on the query path.
pub trait Scalar: Copy + PartialOrd + Display + Send + Sync + 'static {
    /// Total-order comparison between two keys.
    fn cmp_total(self, other: Self) -> Ordering;

    #[inline]
    fn lt_total(self, other: Self) -> bool {
        self.cmp_total(other) == Ordering::Less
    }

    #[inline]
    fn le_total(self, other: Self) -> bool {
        self.cmp_total(other) != Ordering::Greater
    }

    #[inline]
    fn gt_total(self, other: Self) -> bool {
        self.cmp_total(other) == Ordering::Greater
    }

    #[inline]
    fn ge_total(self, other: Self) -> bool {
        self.cmp_total(other) != Ordering::Less
    }

    #[inline]
    fn eq_total(self, other: Self) -> bool {
        self.cmp_total(other) == Ordering::Equal
    }

    /// The greater of two keys under the total order.
    #[inline]
    fn max_total(self, other: Self) -> Self {
        match self.cmp_total(other) {
            Ordering::Less => other,
            _ => self,
        }
    }
}

macro_rules! impl_scalar_int {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            #[inline]
            fn cmp_total(self, other: Self) -> Ordering {
                Ord::cmp(&self, &other)
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            #[inline]
            fn cmp_total(self, other: Self) -> Ordering {
                self.total_cmp(&other)
            }
        }
    )*};
}

impl_scalar_int!(i16, i32, i64, u32, u64);
impl_scalar_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(3i32, 5i32, Ordering::Less)]
    #[case(5i32, 5i32, Ordering::Equal)]
    #[case(7i32, 5i32, Ordering::Greater)]
    fn test_int_cmp(#[case] lhs: i32, #[case] rhs: i32, #[case] expected: Ordering) {
        assert_eq!(lhs.cmp_total(rhs), expected);
    }

    #[test]
    fn test_float_total_order() {
        assert_eq!(1.5f64.cmp_total(2.5), Ordering::Less);
        assert_eq!((-0.0f64).cmp_total(0.0), Ordering::Less);
        assert_eq!(f64::NAN.cmp_total(f64::INFINITY), Ordering::Greater);
    }

    #[test]
    fn test_helpers() {
        assert!(2u32.lt_total(3));
        assert!(3u32.le_total(3));
        assert!(4u32.gt_total(3));
        assert!(3u32.ge_total(3));
        assert!(3u32.eq_total(3));
        assert_eq!(3i64.max_total(9), 9);
        assert_eq!(9i64.max_total(3), 9);
    }
}
