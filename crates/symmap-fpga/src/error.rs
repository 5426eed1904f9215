//! Symbol mapper error types

use std::io;
use thiserror::Error;

/// Result type for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors that can occur while driving the symbol mapper
///
/// The register protocol itself has no error channel. These errors come from
/// the host side: strict address checking, polling budgets and configuration.
#[derive(Error, Debug)]
pub enum MapperError {
    /// Register address outside the four-register map (strict addressing only)
    #[error("Invalid register address: 0x{0:02x}")]
    InvalidAddress(u32),

    /// STATUS.ready not observed within the polling budget
    #[error("Ready timeout polling 0x{address:02x} after {cycles} cycles")]
    Timeout { address: u32, cycles: u32 },

    /// Unknown modulation scheme name
    #[error("Unknown modulation scheme: {0}")]
    InvalidScheme(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to read a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// DOUT requested before any mapping completed
    #[error("No completed symbol available (STATUS.ready = 0)")]
    NotReady,
}

impl MapperError {
    /// Check if retrying the request can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MapperError::Timeout { .. } | MapperError::NotReady)
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(e: serde_json::Error) -> Self {
        MapperError::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        assert!(MapperError::Timeout { address: 1, cycles: 20 }.is_recoverable());
        assert!(MapperError::NotReady.is_recoverable());
        assert!(!MapperError::InvalidAddress(7).is_recoverable());
    }

    #[test]
    fn test_display() {
        let e = MapperError::InvalidAddress(0x7);
        assert_eq!(e.to_string(), "Invalid register address: 0x07");

        let e = MapperError::Timeout { address: 0x1, cycles: 20 };
        assert_eq!(e.to_string(), "Ready timeout polling 0x01 after 20 cycles");
    }
}
