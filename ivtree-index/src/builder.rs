use std::mem;

use ivtree_core::{BuildError, Scalar};

use crate::forest::IntervalForest;

/// Default capacity a fresh [`Builder`] allocates for its buffers.
const DEFAULT_CAPACITY: usize = 16;

/// The largest number of intervals one index can hold. IDs are `u32`, so N is
/// capped at `u32::MAX`; [`Builder::add`] reports
/// [`BuildError::CapacityOverflow`] past that.
pub const MAX_INTERVALS: usize = u32::MAX as usize;

/// Accumulates `[beg, end)` intervals to be stored in an [`IntervalForest`].
///
/// Each added interval receives an ID equal to the number of intervals added
/// before it; queries against the built index report these IDs. The builder
/// tracks whether intervals have arrived in `(beg, end)` lexicographic order:
/// when they have, [`build`](Builder::build) skips the sort and the index
/// carries no permutation table, so adding in sorted order saves both time
/// and space (but isn't required).
///
/// # Examples
///
/// ```
/// use ivtree_index::Builder;
///
/// let mut builder: Builder<u32> = Builder::new();
/// builder.add(100, 200).unwrap();
/// builder.add(150, 300).unwrap();
/// let forest = builder.build();
///
/// assert_eq!(forest.len(), 2);
/// // the builder is reset and can be reused
/// assert!(builder.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Builder<K: Scalar> {
    begs: Vec<K>,
    ends: Vec<K>,
    sorted: bool,
    initial_capacity: usize,
}

impl<K: Scalar> Builder<K> {
    /// Create an empty builder with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty builder sized for `capacity` intervals. The builder
    /// returns to this capacity whenever it is reset by `build`.
    pub fn with_capacity(capacity: usize) -> Self {
        Builder {
            begs: Vec::with_capacity(capacity),
            ends: Vec::with_capacity(capacity),
            sorted: true,
            initial_capacity: capacity,
        }
    }

    /// Add one `[beg, end)` interval to be stored. The positions are
    /// half-open: two intervals with coincident end and begin positions abut
    /// but do not overlap. The same interval may be stored multiple times.
    ///
    /// Returns the ID assigned to the interval, equal to the number of
    /// intervals added before this one. A rejected interval is not added and
    /// leaves the builder unchanged.
    pub fn add(&mut self, beg: K, end: K) -> Result<u32, BuildError> {
        if beg.gt_total(end) {
            return Err(BuildError::InvalidInterval(beg.to_string(), end.to_string()));
        }
        let n = self.begs.len();
        if n >= MAX_INTERVALS {
            return Err(BuildError::CapacityOverflow);
        }
        if self.sorted && n > 0 {
            let prev_beg = self.begs[n - 1];
            let prev_end = self.ends[n - 1];
            if beg.lt_total(prev_beg) || (beg.eq_total(prev_beg) && end.lt_total(prev_end)) {
                self.sorted = false;
            }
        }
        self.begs.push(beg);
        self.ends.push(end);
        Ok(n as u32)
    }

    /// True iff intervals have so far been added in `(beg, end)` sorted
    /// order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of intervals added so far.
    pub fn len(&self) -> usize {
        self.begs.len()
    }

    /// True iff no intervals have been added.
    pub fn is_empty(&self) -> bool {
        self.begs.is_empty()
    }

    /// Build the [`IntervalForest`] from the accumulated intervals. The
    /// builder is reset to its empty initial state afterwards.
    pub fn build(&mut self) -> IntervalForest<K> {
        let mut begs = mem::take(&mut self.begs);
        let mut ends = mem::take(&mut self.ends);
        let sorted = self.sorted;
        self.reset();

        if sorted {
            begs.shrink_to_fit();
            ends.shrink_to_fit();
            return IntervalForest::assemble(begs, ends, None);
        }

        // Stable sort of the insertion indexes by (beg, end), so equal
        // intervals keep their insertion order and query IDs stay
        // deterministic.
        let mut order: Vec<u32> = (0..begs.len() as u32).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (a as usize, b as usize);
            begs[a]
                .cmp_total(begs[b])
                .then_with(|| ends[a].cmp_total(ends[b]))
        });
        let sorted_begs: Vec<K> = order.iter().map(|&i| begs[i as usize]).collect();
        let sorted_ends: Vec<K> = order.iter().map(|&i| ends[i as usize]).collect();
        IntervalForest::assemble(sorted_begs, sorted_ends, Some(order))
    }

    fn reset(&mut self) {
        self.begs = Vec::with_capacity(self.initial_capacity);
        self.ends = Vec::with_capacity(self.initial_capacity);
        self.sorted = true;
    }
}

impl<K: Scalar> Default for Builder<K> {
    fn default() -> Self {
        Self::new()
    }
}
