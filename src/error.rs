//! Error types for range coding.

use thiserror::Error;

/// Error variants for range-coder operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Alphabet size is zero or does not fit below the model ceiling.
    #[error("invalid alphabet size: {0}")]
    InvalidAlphabet(usize),

    /// Symbol is outside the alphabet or has zero frequency under the model.
    #[error("symbol {0} cannot be coded under the current model")]
    InvalidSymbol(usize),

    /// A frequency total exceeds the model ceiling for the counter width.
    #[error("frequency total {0} exceeds the model ceiling")]
    TotalOverflow(u64),

    /// The compressed stream is truncated or garbled.
    #[error("corrupt stream: {0}")]
    Corrupt(&'static str),

    /// An I/O error occurred on the underlying bit stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for range-coder operations.
pub type Result<T> = std::result::Result<T, Error>;
