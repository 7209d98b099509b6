use thiserror::Error;

/// Errors reported while accumulating intervals in a builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// `add` was called with a begin position greater than the end position.
    #[error("invalid interval: begin {0} is greater than end {1}")]
    InvalidInterval(String, String),

    /// The number of stored intervals would exceed the maximum the index can
    /// address.
    #[error("interval index capacity overflow")]
    CapacityOverflow,
}
