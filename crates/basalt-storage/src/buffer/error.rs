//! Buffer pool errors.

use thiserror::Error;

/// Result type for buffer pool operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer pool operations.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Every frame is pinned; no victim can be chosen.
    #[error("no free frames available, all pages are pinned")]
    NoFreeFrames,

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the rejected configuration.
        message: String,
    },
}

impl BufferError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BufferError::NoFreeFrames;
        assert!(err.to_string().contains("pinned"));

        let err = BufferError::config("pool_size must be > 0");
        assert!(err.to_string().contains("pool_size"));
    }
}
