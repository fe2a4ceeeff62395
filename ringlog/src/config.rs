//! Log device configuration

use serde::Deserialize;

use crate::error::{LogError, Result};

/// Default number of records kept before the oldest one is evicted
pub const DEFAULT_CAPACITY: usize = 10;

/// Default record terminator
pub const DEFAULT_TERMINATOR: u8 = b'\n';

/// Fixed parameters of a log device
///
/// - `capacity`: maximum number of committed records retained before
///   eviction begins
/// - `terminator`: the byte value that closes a logical record
///
/// Missing JSON fields fall back to the defaults:
///
/// ```
/// use ringlog::LogConfig;
///
/// let config = LogConfig::from_json(br#"{"capacity": 4}"#).unwrap();
/// assert_eq!(config.capacity, 4);
/// assert_eq!(config.terminator, b'\n');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub capacity: usize,
    pub terminator: u8,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            terminator: DEFAULT_TERMINATOR,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration object
    ///
    /// # Errors
    ///
    /// `LogError::InvalidConfig` if the JSON is malformed or the values
    /// do not pass `validate`.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| LogError::InvalidConfig(format!("Failed to parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `LogError::InvalidConfig` if the capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LogError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
