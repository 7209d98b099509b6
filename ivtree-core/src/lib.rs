//! Core models and the key-type abstraction shared by the ivtree crates.
//!
//! This crate defines the pieces the index and IO layers have in common:
//!
//! - [`Scalar`], the totally ordered coordinate type stored in an index
//!   (integers and floats);
//! - [`Hit`], one overlap-query result: an interval and the ID it was
//!   assigned at insertion time;
//! - [`BuildError`], the errors an index builder can report.
//!
//! Algorithmic code lives in `ivtree-index`; serialization in `ivtree-io`.

pub mod errors;
pub mod key;
pub mod models;

// re-export for cleaner imports
pub use self::errors::BuildError;
pub use self::key::Scalar;
pub use self::models::Hit;
