//! A read-only index of half-open intervals answering overlap queries.
//!
//! This crate stores N `[beg, end)` intervals as a concatenation of implicit,
//! perfect binary interval trees — one per set bit of N — over three parallel
//! sorted arrays, augmented with subtree maximum ends for pruning. The layout
//! is compact, builds in one pass over a sort, and queries touch no heap.
//! It is part of the ivtree project, alongside `ivtree-core` (shared models)
//! and `ivtree-io` (serialization).
//!
//! ## Features
//!
//! - **Fast overlap queries**: find every stored interval overlapping a query
//!   interval, with early termination when the caller has seen enough
//! - **Stable IDs**: results carry the zero-based order in which intervals
//!   were added, regardless of insertion order
//! - **Thread-safe reads**: a built forest is immutable and `Send + Sync`;
//!   any number of threads may query it concurrently with no locking
//!
//! ## Quick Start
//!
//! ```rust
//! use ivtree_index::Builder;
//!
//! // index some annotations (e.g. gene features)
//! let mut builder: Builder<u32> = Builder::new();
//! builder.add(1000, 2000).unwrap(); // ID 0
//! builder.add(1500, 2500).unwrap(); // ID 1
//! builder.add(5000, 6000).unwrap(); // ID 2
//! let forest = builder.build();
//!
//! // materialize the overlaps of a query window
//! let hits = forest.find(1800, 2200);
//! assert_eq!(hits.len(), 2);
//!
//! // or walk them with early termination
//! let mut first = None;
//! forest.walk(1800, 2200, |pos| {
//!     first = Some(forest.id(pos));
//!     false
//! });
//! assert_eq!(first, Some(0));
//! ```
//!
//! ## Query results
//!
//! Hits are delivered in ascending sorted position: slices in layout order,
//! each slice's index node before its embedded tree, tree hits in-order.
//! Callers that need insertion order can collect and reorder by
//! [`Hit::id`](ivtree_core::Hit).

/// Interval accumulation and the build-time sort.
///
/// See [`Builder`] for details.
pub mod builder;

/// The immutable forest and its query engine.
///
/// See [`IntervalForest`] for details.
pub mod forest;

mod node;

// re-exports
pub use self::builder::{Builder, MAX_INTERVALS};
pub use self::forest::{IntervalForest, Iter, PartsError};
pub use ivtree_core::{BuildError, Hit, Scalar};
