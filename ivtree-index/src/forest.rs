use thiserror::Error;

use ivtree_core::{Hit, Scalar};

use crate::node;

/// Errors from [`IntervalForest::from_parts`] when handed arrays that don't
/// form a well-built index (typically a corrupt or tampered serialized
/// payload).
#[derive(Debug, Error)]
pub enum PartsError {
    #[error("parallel array length mismatch: begs={0}, ends={1}, max_ends={2}")]
    LengthMismatch(usize, usize, usize),
    #[error("slice offsets do not match the binary decomposition of {0} intervals")]
    BadSliceLayout(usize),
    #[error("interval at sorted position {0} ends before it begins")]
    NegativeInterval(usize),
    #[error("intervals out of (beg, end) sorted order at position {0}")]
    Unsorted(usize),
    #[error("augmentation value at position {0} does not match the recomputed subtree maximum")]
    BadAugmentation(usize),
    #[error("permutation is not a bijection over interval IDs")]
    BadPermutation,
}

/// A read-only index of `[beg, end)` intervals answering overlap queries.
///
/// The N stored intervals live in three parallel arrays sorted by
/// `(beg, end)`. Writing N as a sum of powers of two, the arrays decompose
/// into slices of those lengths; the leftmost item of each slice is an
/// "index node" and the `2^p - 1` items after it form an implicit binary
/// search tree as in Li's cgranges. The trees are perfect by construction,
/// which keeps the node arithmetic branch-free. Each position also carries
/// the maximum interval end within its subtree, which is what lets a query
/// prune whole subtrees.
///
/// Once built the forest never changes: it is a plain value that any number
/// of threads may query concurrently, and no query allocates.
///
/// # Examples
///
/// ```
/// use ivtree_index::Builder;
///
/// let mut builder: Builder<u32> = Builder::new();
/// builder.add(1000, 2000).unwrap(); // ID 0
/// builder.add(1500, 2500).unwrap(); // ID 1
/// builder.add(5000, 6000).unwrap(); // ID 2
/// let forest = builder.build();
///
/// let hits = forest.find(1800, 2200);
/// let ids: Vec<u32> = hits.iter().map(|h| h.id).collect();
/// assert_eq!(ids, vec![0, 1]);
///
/// assert!(forest.overlaps(5500, 5600));
/// assert!(!forest.overlaps(2500, 5000));
/// ```
#[derive(Debug, Clone)]
pub struct IntervalForest<K: Scalar> {
    /// Interval begin positions, sorted by (beg, end).
    begs: Vec<K>,
    /// Interval end positions, parallel to `begs`.
    ends: Vec<K>,
    /// Subtree maximum end per position; for an index node, the maximum over
    /// its entire slice.
    max_ends: Vec<K>,
    /// Slice boundaries: first 0, last N, adjacent differences the powers of
    /// two of N in descending order.
    index_nodes: Vec<usize>,
    /// Sorted position -> insertion ID, absent when insertions were already
    /// sorted.
    permute: Option<Vec<u32>>,
}

/// Slice boundaries for `n` intervals: the running prefix sums of the powers
/// of two in `n`'s binary expansion, highest bit first, with a sentinel `n`
/// at the end.
fn slice_offsets(n: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(n.count_ones() as usize + 1);
    offsets.push(0);
    let mut rem = n;
    while rem > 0 {
        let high = 1usize << (usize::BITS - 1 - rem.leading_zeros());
        let last = offsets[offsets.len() - 1];
        offsets.push(last + high);
        rem &= !high;
    }
    debug_assert_eq!(offsets[offsets.len() - 1], n);
    offsets
}

/// Bottom-up maxEnd computation for the subtree rooted at `ofs + node_pos`.
/// Both children are always present and must be finalized before their
/// parent.
fn recurse_max_ends<K: Scalar>(
    ends: &[K],
    max_ends: &mut [K],
    ofs: usize,
    node_pos: usize,
    lvl: u32,
) {
    let mut max_end = ends[ofs + node_pos];
    if lvl > 0 {
        let left = node::left_child(node_pos, lvl);
        recurse_max_ends(ends, max_ends, ofs, left, lvl - 1);
        max_end = max_end.max_total(max_ends[ofs + left]);
        let right = node::right_child(node_pos, lvl);
        recurse_max_ends(ends, max_ends, ofs, right, lvl - 1);
        max_end = max_end.max_total(max_ends[ofs + right]);
    }
    max_ends[ofs + node_pos] = max_end;
}

/// Augmentation values for sorted `ends` under the given slice layout: every
/// tree position folded up bottom-up, each index node carrying its slice
/// maximum.
fn compute_max_ends<K: Scalar>(ends: &[K], index_nodes: &[usize]) -> Vec<K> {
    let mut max_ends = ends.to_vec();
    for which in 0..index_nodes.len() - 1 {
        let i = index_nodes[which];
        let sz = index_nodes[which + 1] - i;
        if sz > 1 {
            let root = node::root_node(sz - 1);
            recurse_max_ends(ends, &mut max_ends, i + 1, root, node::level(root));
            max_ends[i] = ends[i].max_total(max_ends[i + 1 + root]);
        }
    }
    max_ends
}

impl<K: Scalar> IntervalForest<K> {
    /// Assemble the forest from sorted arrays: compute the slice offsets and
    /// the augmentation values. Called by [`Builder::build`](crate::Builder).
    pub(crate) fn assemble(begs: Vec<K>, ends: Vec<K>, permute: Option<Vec<u32>>) -> Self {
        let index_nodes = slice_offsets(begs.len());
        let max_ends = compute_max_ends(&ends, &index_nodes);
        IntervalForest {
            begs,
            ends,
            max_ends,
            index_nodes,
            permute,
        }
    }

    /// Reconstruct a forest from its raw arrays, as read back by a
    /// deserializer. The structural invariants are checked — including
    /// recomputing the augmentation bottom-up and requiring an exact match —
    /// so that a corrupt payload surfaces as an error rather than an index
    /// returning wrong answers.
    pub fn from_parts(
        begs: Vec<K>,
        ends: Vec<K>,
        max_ends: Vec<K>,
        index_nodes: Vec<usize>,
        permute: Option<Vec<u32>>,
    ) -> Result<Self, PartsError> {
        let n = begs.len();
        if ends.len() != n || max_ends.len() != n {
            return Err(PartsError::LengthMismatch(n, ends.len(), max_ends.len()));
        }
        if index_nodes != slice_offsets(n) {
            return Err(PartsError::BadSliceLayout(n));
        }
        for i in 0..n {
            if ends[i].lt_total(begs[i]) {
                return Err(PartsError::NegativeInterval(i));
            }
            if i > 0
                && (begs[i].lt_total(begs[i - 1])
                    || (begs[i].eq_total(begs[i - 1]) && ends[i].lt_total(ends[i - 1])))
            {
                return Err(PartsError::Unsorted(i));
            }
        }
        // an understated maxEnd would make queries skip live subtrees, a
        // false negative no later check could catch; require the exact
        // recomputed values
        let expected = compute_max_ends(&ends, &index_nodes);
        for i in 0..n {
            if !max_ends[i].eq_total(expected[i]) {
                return Err(PartsError::BadAugmentation(i));
            }
        }
        if let Some(permute) = &permute {
            if permute.len() != n {
                return Err(PartsError::BadPermutation);
            }
            let mut seen = vec![false; n];
            for &id in permute {
                let id = id as usize;
                if id >= n || seen[id] {
                    return Err(PartsError::BadPermutation);
                }
                seen[id] = true;
            }
        }
        Ok(IntervalForest {
            begs,
            ends,
            max_ends,
            index_nodes,
            permute,
        })
    }

    /// Total number of intervals stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.begs.len()
    }

    /// True iff no intervals are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begs.is_empty()
    }

    /// The insertion ID of the interval at `sorted_pos`.
    #[inline]
    pub fn id(&self, sorted_pos: usize) -> u32 {
        match &self.permute {
            Some(permute) => permute[sorted_pos],
            None => sorted_pos as u32,
        }
    }

    /// The `(beg, end)` interval at `sorted_pos`.
    #[inline]
    pub fn interval(&self, sorted_pos: usize) -> (K, K) {
        (self.begs[sorted_pos], self.ends[sorted_pos])
    }

    #[inline]
    fn hit_at(&self, sorted_pos: usize) -> Hit<K> {
        Hit {
            beg: self.begs[sorted_pos],
            end: self.ends[sorted_pos],
            id: self.id(sorted_pos),
        }
    }

    /// Walk every stored interval overlapping the query `[qbeg, qend)`,
    /// invoking `visit` with each sorted position exactly once. `visit`
    /// returns `true` to continue or `false` to stop the walk immediately;
    /// `walk` returns `false` iff it was stopped early.
    ///
    /// Positions are delivered in ascending order: slices in layout order,
    /// each slice's index node before its tree, tree hits in-order. An empty
    /// or inverted query (`qbeg >= qend`) yields nothing, since a half-open
    /// query without any positions of its own cannot overlap anything.
    pub fn walk<F>(&self, qbeg: K, qend: K, mut visit: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        if qbeg.ge_total(qend) {
            return true;
        }
        for which in 0..self.index_nodes.len() - 1 {
            let i = self.index_nodes[which];
            if self.begs[i].ge_total(qend) {
                // index nodes sit in sorted position, so the whole remainder
                // of the beg-sorted array is irrelevant
                break;
            }
            if self.max_ends[i].gt_total(qbeg) {
                // index node is a hit itself, return it first
                if self.ends[i].gt_total(qbeg) && !visit(i) {
                    return false;
                }
                // search the adjacent tree occupying the slice from (i+1)
                // until the next index node; the root offset follows from
                // the tree size
                let sz = self.index_nodes[which + 1] - i;
                if sz > 1 {
                    let root = node::root_node(sz - 1);
                    if !self.recurse_query(qbeg, qend, i + 1, root, node::level(root), &mut visit) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn recurse_query<F>(
        &self,
        qbeg: K,
        qend: K,
        ofs: usize,
        node_pos: usize,
        lvl: u32,
        visit: &mut F,
    ) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let i = ofs + node_pos;
        if self.max_ends[i].gt_total(qbeg) {
            if lvl > 0
                && !self.recurse_query(
                    qbeg,
                    qend,
                    ofs,
                    node::left_child(node_pos, lvl),
                    lvl - 1,
                    visit,
                )
            {
                return false;
            }
            if self.begs[i].lt_total(qend) {
                if self.ends[i].gt_total(qbeg) && !visit(i) {
                    return false;
                }
                if lvl > 0
                    && !self.recurse_query(
                        qbeg,
                        qend,
                        ofs,
                        node::right_child(node_pos, lvl),
                        lvl - 1,
                        visit,
                    )
                {
                    return false;
                }
            }
        }
        true
    }

    /// Walk the sorted positions of every stored interval exactly equal to
    /// `(qbeg, qend)`, in ascending position order, with the same early-stop
    /// contract as [`walk`](IntervalForest::walk). Binary-searches the
    /// beg-sorted array rather than traversing the forest.
    pub fn walk_exact<F>(&self, qbeg: K, qend: K, mut visit: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let mut p = self.begs.partition_point(|b| b.lt_total(qbeg));
        // within a run of equal begs the ends ascend, so the matches are a
        // contiguous run ending where end first exceeds qend
        while p < self.begs.len()
            && self.begs[p].eq_total(qbeg)
            && self.ends[p].le_total(qend)
        {
            if self.ends[p].eq_total(qend) && !visit(p) {
                return false;
            }
            p += 1;
        }
        true
    }

    /// Walk the IDs of every stored interval overlapping `[qbeg, qend)`,
    /// avoiding [`Hit`] construction for callers that only need IDs.
    pub fn walk_ids<F>(&self, qbeg: K, qend: K, mut visit: F) -> bool
    where
        F: FnMut(u32) -> bool,
    {
        self.walk(qbeg, qend, |i| visit(self.id(i)))
    }

    /// Materialize every stored interval overlapping `[qbeg, qend)`.
    ///
    /// ```
    /// use ivtree_index::Builder;
    ///
    /// let mut builder: Builder<i32> = Builder::new();
    /// builder.add(0, 23).unwrap();
    /// builder.add(12, 34).unwrap();
    /// builder.add(34, 56).unwrap();
    /// let forest = builder.build();
    ///
    /// let hits = forest.find(22, 25);
    /// assert_eq!(hits.len(), 2);
    /// assert_eq!((hits[0].beg, hits[0].end, hits[0].id), (0, 23, 0));
    /// assert_eq!((hits[1].beg, hits[1].end, hits[1].id), (12, 34, 1));
    /// ```
    pub fn find(&self, qbeg: K, qend: K) -> Vec<Hit<K>> {
        let mut hits = Vec::new();
        self.walk(qbeg, qend, |i| {
            hits.push(self.hit_at(i));
            true
        });
        hits
    }

    /// Any one stored interval overlapping `[qbeg, qend)`, or `None`.
    pub fn find_any(&self, qbeg: K, qend: K) -> Option<Hit<K>> {
        let mut found = None;
        self.walk(qbeg, qend, |i| {
            found = Some(self.hit_at(i));
            false
        });
        found
    }

    /// Whether any stored interval overlaps `[qbeg, qend)`.
    pub fn overlaps(&self, qbeg: K, qend: K) -> bool {
        !self.walk(qbeg, qend, |_| false)
    }

    /// The ID of any one stored interval exactly equal to `(qbeg, qend)`, or
    /// `None`.
    pub fn find_any_exact(&self, qbeg: K, qend: K) -> Option<u32> {
        let mut found = None;
        self.walk_exact(qbeg, qend, |i| {
            found = Some(self.id(i));
            false
        });
        found
    }

    /// Whether any stored interval exactly equals `(qbeg, qend)`.
    pub fn exact_exists(&self, qbeg: K, qend: K) -> bool {
        self.find_any_exact(qbeg, qend).is_some()
    }

    /// Iterate over every stored interval in sorted order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            forest: self,
            pos: 0,
        }
    }

    /// Debug self-check of the structural invariants: interval validity,
    /// sorted order, slice layout, exact augmentation values, and the
    /// permutation bijection. Panics on violation; a violation indicates a
    /// bug in the build, not caller error.
    pub fn validate(&self) {
        let n = self.begs.len();
        assert_eq!(self.ends.len(), n);
        assert_eq!(self.max_ends.len(), n);
        assert_eq!(self.index_nodes, slice_offsets(n));

        for i in 0..n {
            assert!(self.ends[i].ge_total(self.begs[i]));
            if i > 0 {
                if self.begs[i].eq_total(self.begs[i - 1]) {
                    assert!(self.ends[i].ge_total(self.ends[i - 1]));
                } else {
                    assert!(self.begs[i].gt_total(self.begs[i - 1]));
                }
            }
            assert!(
                self.max_ends[i].ge_total(self.ends[i]),
                "maxEnd below end at sorted position {i}"
            );
        }

        // recompute the augmentation and require an exact match
        let expected = compute_max_ends(&self.ends, &self.index_nodes);
        for i in 0..n {
            assert!(
                self.max_ends[i].eq_total(expected[i]),
                "maxEnd mismatch at sorted position {i}"
            );
        }

        if let Some(permute) = &self.permute {
            assert_eq!(permute.len(), n);
            let mut seen = vec![false; n];
            for &id in permute {
                assert!((id as usize) < n && !seen[id as usize]);
                seen[id as usize] = true;
            }
        }
    }

    /// Raw layout accessors for the serializer.
    #[inline]
    pub fn begs(&self) -> &[K] {
        &self.begs
    }

    #[inline]
    pub fn ends(&self) -> &[K] {
        &self.ends
    }

    #[inline]
    pub fn max_ends(&self) -> &[K] {
        &self.max_ends
    }

    #[inline]
    pub fn index_nodes(&self) -> &[usize] {
        &self.index_nodes
    }

    #[inline]
    pub fn permute(&self) -> Option<&[u32]> {
        self.permute.as_deref()
    }
}

/// Iterator over every stored interval in sorted order, yielding [`Hit`]s.
///
/// Created by [`IntervalForest::iter`].
#[derive(Debug)]
pub struct Iter<'a, K: Scalar> {
    forest: &'a IntervalForest<K>,
    pos: usize,
}

impl<K: Scalar> Iterator for Iter<'_, K> {
    type Item = Hit<K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.forest.len() {
            None
        } else {
            self.pos += 1;
            Some(self.forest.hit_at(self.pos - 1))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.forest.len() - self.pos;
        (rem, Some(rem))
    }
}

impl<K: Scalar> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K: Scalar> IntoIterator for &'a IntervalForest<K> {
    type Item = Hit<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::Builder;

    fn build_from(pairs: &[(i32, i32)]) -> IntervalForest<i32> {
        let mut builder = Builder::new();
        for &(beg, end) in pairs {
            builder.add(beg, end).unwrap();
        }
        builder.build()
    }

    fn triples(hits: &[Hit<i32>]) -> Vec<(i32, i32, u32)> {
        hits.iter().map(|h| (h.beg, h.end, h.id)).collect()
    }

    #[fixture]
    fn basic_three() -> IntervalForest<i32> {
        build_from(&[(0, 23), (12, 34), (34, 56)])
    }

    #[rstest]
    fn test_basic_three_overlap(basic_three: IntervalForest<i32>) {
        assert_eq!(
            triples(&basic_three.find(22, 25)),
            vec![(0, 23, 0), (12, 34, 1)]
        );
        assert_eq!(triples(&basic_three.find(33, 34)), vec![(12, 34, 1)]);
        assert_eq!(triples(&basic_three.find(56, 100)), vec![]);
    }

    #[rstest]
    fn test_empty_query_yields_nothing(basic_three: IntervalForest<i32>) {
        // a zero-width or inverted query has no positions of its own
        assert_eq!(basic_three.find(34, 34), vec![]);
        assert_eq!(basic_three.find(22, 22), vec![]);
        assert_eq!(basic_three.find(25, 22), vec![]);
        assert!(!basic_three.overlaps(22, 22));
    }

    #[test]
    fn test_abutting_intervals() {
        let forest = build_from(&[(0, 10), (10, 20)]);
        assert_eq!(triples(&forest.find(10, 10)), vec![]);
        assert_eq!(triples(&forest.find(9, 10)), vec![(0, 10, 0)]);
        assert_eq!(triples(&forest.find(10, 11)), vec![(10, 20, 1)]);
        assert_eq!(triples(&forest.find(9, 11)), vec![(0, 10, 0), (10, 20, 1)]);
    }

    #[test]
    fn test_unsorted_insertion_ids() {
        // IDs track insertion order even though the layout is sorted
        let forest = build_from(&[(50, 60), (10, 20), (30, 40), (10, 15)]);
        assert!(forest.permute().is_some());
        assert_eq!(
            triples(&forest.find(12, 35)),
            vec![(10, 15, 3), (10, 20, 1), (30, 40, 2)]
        );
        assert_eq!(triples(&forest.find(45, 55)), vec![(50, 60, 0)]);
    }

    #[test]
    fn test_duplicate_intervals() {
        let forest = build_from(&[(5, 7), (5, 7), (5, 7)]);
        assert!(forest.permute().is_none());
        assert_eq!(triples(&forest.find(6, 6)), vec![]);
        assert_eq!(
            triples(&forest.find(5, 6)),
            vec![(5, 7, 0), (5, 7, 1), (5, 7, 2)]
        );

        let mut exact_ids = Vec::new();
        forest.walk_exact(5, 7, |i| {
            exact_ids.push(forest.id(i));
            true
        });
        assert_eq!(exact_ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_three_slice_forest() {
        // N = 7 = 4 + 2 + 1: slices [0,4), [4,6), [6,7)
        let forest = build_from(&[
            (0, 5),
            (10, 15),
            (20, 25),
            (30, 100),
            (40, 45),
            (50, 120),
            (60, 65),
        ]);
        assert_eq!(forest.index_nodes(), &[0, 4, 6, 7]);
        forest.validate();

        // only the second slice's tree node reaches this far right
        assert_eq!(triples(&forest.find(110, 115)), vec![(50, 120, 5)]);
        // hits spanning slice boundaries come out in ascending position
        assert_eq!(
            triples(&forest.find(99, 111)),
            vec![(30, 100, 3), (50, 120, 5)]
        );
        // slice 0 tree hit, then slice 1's index node, then slice 1's tree
        assert_eq!(
            triples(&forest.find(44, 51)),
            vec![(30, 100, 3), (40, 45, 4), (50, 120, 5)]
        );
    }

    #[test]
    fn test_early_termination() {
        let mut builder = Builder::new();
        for i in 0..1000 {
            builder.add(i, i + 5).unwrap();
        }
        let forest = builder.build();

        let mut calls = 0;
        let completed = forest.walk(0, 1000, |_| {
            calls += 1;
            false
        });
        assert!(!completed);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_walk_positions_ascend() {
        let forest = build_from(&[
            (0, 80),
            (5, 10),
            (15, 90),
            (20, 30),
            (25, 70),
            (40, 55),
            (60, 65),
        ]);
        let mut positions = Vec::new();
        forest.walk(0, 100, |i| {
            positions.push(i);
            true
        });
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_forest() {
        let forest: IntervalForest<i32> = Builder::new().build();
        assert_eq!(forest.len(), 0);
        assert!(forest.is_empty());
        assert_eq!(forest.index_nodes(), &[0]);
        assert_eq!(forest.find(0, 100), vec![]);
        assert!(forest.walk(0, 100, |_| false));
        assert_eq!(forest.iter().count(), 0);
        forest.validate();
    }

    #[test]
    fn test_single_interval() {
        let forest = build_from(&[(3, 9)]);
        assert_eq!(forest.index_nodes(), &[0, 1]);
        assert_eq!(triples(&forest.find(0, 4)), vec![(3, 9, 0)]);
        assert_eq!(triples(&forest.find(9, 12)), vec![]);
        forest.validate();
    }

    #[test]
    fn test_zero_width_stored_interval() {
        // a stored [6,6) occupies no positions but still satisfies the
        // overlap predicate against queries that straddle it
        let forest = build_from(&[(0, 10), (6, 6)]);
        assert_eq!(triples(&forest.find(5, 7)), vec![(0, 10, 0), (6, 6, 1)]);
        assert_eq!(triples(&forest.find(6, 7)), vec![(0, 10, 0)]);
    }

    #[rstest]
    fn test_find_any_reports_first_hit(basic_three: IntervalForest<i32>) {
        let hit = basic_three.find_any(22, 25).unwrap();
        assert_eq!((hit.beg, hit.end, hit.id), (0, 23, 0));
        assert_eq!(basic_three.find_any(100, 200), None);
    }

    #[rstest]
    fn test_walk_ids(basic_three: IntervalForest<i32>) {
        let mut ids = Vec::new();
        basic_three.walk_ids(22, 40, |id| {
            ids.push(id);
            true
        });
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_exact_queries() {
        let forest = build_from(&[(5, 7), (3, 4), (5, 7), (5, 9)]);
        // the two [5,7) copies keep their insertion IDs in order
        let mut exact_ids = Vec::new();
        forest.walk_exact(5, 7, |i| {
            exact_ids.push(forest.id(i));
            true
        });
        assert_eq!(exact_ids, vec![0, 2]);

        assert_eq!(forest.find_any_exact(5, 7), Some(0));
        assert_eq!(forest.find_any_exact(5, 8), None);
        assert!(forest.exact_exists(3, 4));
        assert!(forest.exact_exists(5, 9));
        assert!(!forest.exact_exists(4, 7));
        assert!(!forest.exact_exists(5, 6));
    }

    #[test]
    fn test_exact_walk_early_stop() {
        let forest = build_from(&[(5, 7), (5, 7), (5, 7)]);
        let mut calls = 0;
        let completed = forest.walk_exact(5, 7, |_| {
            calls += 1;
            false
        });
        assert!(!completed);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_iter_all_sorted() {
        let forest = build_from(&[(50, 60), (10, 20), (30, 40)]);
        let all: Vec<(i32, i32, u32)> = forest.iter().map(|h| (h.beg, h.end, h.id)).collect();
        assert_eq!(all, vec![(10, 20, 1), (30, 40, 2), (50, 60, 0)]);
        assert_eq!(forest.iter().len(), 3);

        let via_ref: Vec<Hit<i32>> = (&forest).into_iter().collect();
        assert_eq!(via_ref.len(), 3);
    }

    #[test]
    fn test_sorted_fast_path_equivalence() {
        let pairs = [(0, 10), (2, 8), (4, 12), (6, 6)];
        let mut reversed = pairs;
        reversed.reverse();

        let sorted = build_from(&pairs);
        let shuffled = build_from(&reversed);
        assert!(sorted.permute().is_none());
        assert!(shuffled.permute().is_some());

        for (qbeg, qend) in [(5, 7), (0, 20), (11, 12), (8, 8), (-5, 1)] {
            let lhs: Vec<(i32, i32)> = sorted.find(qbeg, qend).iter().map(|h| (h.beg, h.end)).collect();
            let rhs: Vec<(i32, i32)> = shuffled.find(qbeg, qend).iter().map(|h| (h.beg, h.end)).collect();
            assert_eq!(lhs, rhs, "query [{qbeg},{qend})");
        }
    }

    #[test]
    fn test_float_keys() {
        let mut builder: Builder<f64> = Builder::new();
        builder.add(0.5, 2.5).unwrap();
        builder.add(1.5, 3.5).unwrap();
        builder.add(4.0, 5.0).unwrap();
        let forest = builder.build();
        forest.validate();

        assert_eq!(forest.find(2.0, 4.5).len(), 3);
        assert_eq!(forest.find(3.5, 4.0).len(), 0);
        assert!(forest.exact_exists(1.5, 3.5));
    }

    #[test]
    fn test_validate_across_sizes() {
        for n in 0..64i32 {
            let mut builder = Builder::new();
            for i in 0..n {
                // begs descend so the permutation path is exercised
                builder.add(n - i, n - i + (i % 7)).unwrap();
            }
            let forest = builder.build();
            assert_eq!(forest.len(), n as usize);
            forest.validate();
        }
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let forest = build_from(&[(50, 60), (10, 20), (30, 40)]);
        let rebuilt = IntervalForest::from_parts(
            forest.begs().to_vec(),
            forest.ends().to_vec(),
            forest.max_ends().to_vec(),
            forest.index_nodes().to_vec(),
            forest.permute().map(|p| p.to_vec()),
        )
        .unwrap();
        assert_eq!(triples(&rebuilt.find(15, 35)), triples(&forest.find(15, 35)));
    }

    #[test]
    fn test_from_parts_rejects_corrupt() {
        let forest = build_from(&[(10, 20), (30, 40)]);
        let swap = |begs: Vec<i32>| {
            IntervalForest::from_parts(
                begs,
                forest.ends().to_vec(),
                forest.max_ends().to_vec(),
                forest.index_nodes().to_vec(),
                None,
            )
        };
        assert!(matches!(
            swap(vec![15, 10]),
            Err(PartsError::Unsorted(1))
        ));
        assert!(matches!(
            swap(vec![25, 30]),
            Err(PartsError::NegativeInterval(0))
        ));
        assert!(matches!(
            swap(vec![10]),
            Err(PartsError::LengthMismatch(1, 2, 2))
        ));
        assert!(matches!(
            IntervalForest::from_parts(
                forest.begs().to_vec(),
                forest.ends().to_vec(),
                forest.max_ends().to_vec(),
                vec![0, 1, 2],
                None,
            ),
            Err(PartsError::BadSliceLayout(2))
        ));
        assert!(matches!(
            IntervalForest::from_parts(
                forest.begs().to_vec(),
                forest.ends().to_vec(),
                forest.max_ends().to_vec(),
                forest.index_nodes().to_vec(),
                Some(vec![1, 1]),
            ),
            Err(PartsError::BadPermutation)
        ));
    }

    #[test]
    fn test_from_parts_rejects_understated_augmentation() {
        let forest = build_from(&[(0, 5), (10, 20)]);
        assert_eq!(forest.max_ends(), &[20, 20]);
        // 10 still exceeds ends[0] = 5, but as the slice summary it would
        // make queries like [15,25) skip the slice and miss [10,20)
        let err = IntervalForest::from_parts(
            forest.begs().to_vec(),
            forest.ends().to_vec(),
            vec![10, 20],
            forest.index_nodes().to_vec(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PartsError::BadAugmentation(0)));
    }

    #[test]
    fn test_forest_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IntervalForest<i64>>();
        assert_send_sync::<IntervalForest<f64>>();
    }
}
