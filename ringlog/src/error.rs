//! Error type for log device operations

use std::io;

/// Errors reported by the log device
///
/// End of stream is not an error: a read past the logical end returns
/// `Ok(0)`. Short copies into or out of caller buffers are not errors either.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// Waiting for the device lock was interrupted. Nothing was changed,
    /// the whole operation can be retried.
    #[error("interrupted while waiting for the log lock")]
    Interrupted,

    /// The pending record could not grow. Committed records and already
    /// pending bytes are unchanged.
    #[error("out of memory growing pending record by {requested} bytes")]
    OutOfMemory { requested: usize },

    /// A single write carried bytes after the terminator. The write is
    /// rejected as a whole.
    #[error("write has data after the terminator at offset {offset}")]
    TrailingAfterTerminator { offset: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LogError>;

impl LogError {
    /// Whether the caller may simply retry the same call later
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl embedded_io_async::Error for LogError {
    fn kind(&self) -> embedded_io_async::ErrorKind {
        match self {
            Self::Interrupted => embedded_io_async::ErrorKind::Interrupted,
            Self::OutOfMemory { .. } => embedded_io_async::ErrorKind::OutOfMemory,
            Self::TrailingAfterTerminator { .. } => embedded_io_async::ErrorKind::InvalidData,
            Self::InvalidConfig(_) => embedded_io_async::ErrorKind::InvalidInput,
        }
    }
}

impl From<LogError> for io::Error {
    fn from(e: LogError) -> Self {
        let kind = match e {
            LogError::Interrupted => io::ErrorKind::Interrupted,
            LogError::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            LogError::TrailingAfterTerminator { .. } => io::ErrorKind::InvalidData,
            LogError::InvalidConfig(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_interrupted_is_retryable() {
        assert!(LogError::Interrupted.is_retryable());
        assert!(!LogError::OutOfMemory { requested: 1 }.is_retryable());
        assert!(!LogError::TrailingAfterTerminator { offset: 2 }.is_retryable());
    }

    #[test]
    fn test_io_error_kind() {
        let e: io::Error = LogError::Interrupted.into();
        assert_eq!(e.kind(), io::ErrorKind::Interrupted);

        let e: io::Error = LogError::OutOfMemory { requested: 8 }.into();
        assert_eq!(e.kind(), io::ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LogError::TrailingAfterTerminator { offset: 3 }.to_string(),
            "write has data after the terminator at offset 3"
        );
    }
}
