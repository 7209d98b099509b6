use std::fmt;

use crate::key::Scalar;

/// One overlap-query result: a stored `[beg, end)` interval and the ID it was
/// assigned when added to the builder (zero-based insertion order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<K: Scalar> {
    pub beg: K,
    pub end: K,
    pub id: u32,
}

impl<K: Scalar> fmt::Display for Hit<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})={}", self.beg, self.end, self.id)
    }
}
