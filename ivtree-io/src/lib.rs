//! # Serialization for ivtree interval indexes.
//!
//! A built [`IntervalForest`](ivtree_index::IntervalForest) is a handful of
//! immutable arrays, which makes it a natural broadcast payload: this crate
//! packs them into a compact, versioned, little-endian `.ivt` stream and
//! reads them back bitwise-identically, so a deserialized index answers every
//! query exactly like the original.
//!
//! ```
//! use ivtree_index::Builder;
//! use ivtree_io::{read_forest, write_forest};
//!
//! let mut builder: Builder<i32> = Builder::new();
//! builder.add(0, 23).unwrap();
//! builder.add(12, 34).unwrap();
//! let forest = builder.build();
//!
//! let mut bytes = Vec::new();
//! write_forest(&forest, &mut bytes).unwrap();
//! let restored = read_forest::<i32, _>(&mut bytes.as_slice()).unwrap();
//!
//! assert_eq!(restored.find(20, 30), forest.find(20, 30));
//! ```
pub mod codec;
pub mod consts;
pub mod error;
pub mod ivt;

// re-expose core functions
pub use codec::*;
pub use consts::*;
pub use error::*;
pub use ivt::*;
