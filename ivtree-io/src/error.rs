use std::io;

use thiserror::Error;
use ivtree_index::PartsError;

/// Error type for ivtree-io operations.
#[derive(Error, Debug)]
pub enum IvtError {
    /// IO error occurred while reading or writing the stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stream does not open with the `.ivt` magic bytes.
    #[error("stream doesn't appear to contain a serialized interval forest")]
    InvalidMagic,

    /// The stream was written by an unknown format version.
    #[error("unsupported .ivt format version: {0}")]
    UnsupportedVersion(u8),

    /// The stream stores a different key type than the one requested.
    #[error("key type tag mismatch: stream has {found:#04x}, expected {expected:#04x}")]
    KeyTypeMismatch { expected: u8, found: u8 },

    /// The stored interval count exceeds what an index can address.
    #[error("stored interval count {0} exceeds the addressable maximum")]
    OversizedIndex(u64),

    /// The payload decoded but does not form a well-built index.
    #[error("corrupt index payload: {0}")]
    CorruptIndex(#[from] PartsError),
}

/// Result type alias for ivtree-io operations.
pub type Result<T> = std::result::Result<T, IvtError>;
