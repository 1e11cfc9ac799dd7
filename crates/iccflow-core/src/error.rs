//! Error types for iccflow
//!
//! "No transform" is never an error here: adaptation and joining return
//! `Option`. The variants below cover malformed input and misuse of the
//! buffer APIs.

use thiserror::Error;

use crate::icc::IccError;

/// Result type for iccflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in iccflow operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The ICC data is malformed or uses an unsupported layout
    #[error("ICC error: {0}")]
    Icc(#[from] IccError),

    /// A lookup table grid was declared with an unusable shape
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A pipeline could not be built between the requested types
    #[error("No transform from {from} to {to}")]
    NoTransform {
        from: &'static str,
        to: &'static str,
    },

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
