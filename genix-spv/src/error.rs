//! Error types for the Genix SPV chain core.

use std::io;

use genix_network::{Network, UnknownNetwork};
use thiserror::Error;

use crate::types::BlockHash;

/// Main error type for the Genix SPV chain core.
#[derive(Debug, Error)]
pub enum SpvError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration errors. These are fatal and surface at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownNetwork(#[from] UnknownNetwork),

    #[error("Invalid checkpoint table for {network}: {source}")]
    InvalidCheckpoints {
        network: Network,
        source: CheckpointTableError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A checkpoint table that cannot be used as a set of transition anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckpointTableError {
    #[error("checkpoint at height {height} does not follow height {previous}")]
    NotAscending {
        previous: u32,
        height: u32,
    },

    #[error("checkpoint at height {height} is not on a {interval}-block transition boundary")]
    Misaligned {
        height: u32,
        interval: u32,
    },
}

/// Header validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The header does not attach to any known header.
    #[error("Missing parent header: {0}")]
    MissingParent(BlockHash),

    /// The header sits at a checkpoint height but carries a different hash.
    #[error("Header {hash} conflicts with the checkpoint at height {height}")]
    CheckpointMismatch {
        height: u32,
        hash: BlockHash,
    },

    /// The target-verification primitive rejected the header.
    #[error("Difficulty mismatch for header {hash} at height {height}")]
    DifficultyMismatch {
        height: u32,
        hash: BlockHash,
    },
}

/// Logging-related errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] io::Error),

    #[error("Subscriber initialization failed: {0}")]
    SubscriberInit(String),

    #[error("Log rotation failed: {0}")]
    RotationFailed(String),
}

/// Type alias for Result with SpvError.
pub type Result<T> = std::result::Result<T, SpvError>;

/// Type alias for configuration results.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Type alias for validation results.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Type alias for logging operation results.
pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[cfg(test)]
mod tests {
    use bitcoin_hashes::Hash;

    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::from(UnknownNetwork("devnet".to_string()));
        assert_eq!(err.to_string(), "Unknown network: devnet");

        let err = ConfigError::InvalidCheckpoints {
            network: Network::Mainnet,
            source: CheckpointTableError::Misaligned {
                height: 13205,
                interval: 2016,
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid checkpoint table for mainnet: checkpoint at height 13205 is not on a 2016-block transition boundary"
        );
    }

    #[test]
    fn test_spv_error_conversions() {
        let err: SpvError = ValidationError::MissingParent(BlockHash::all_zeros()).into();
        assert!(matches!(err, SpvError::Validation(ValidationError::MissingParent(_))));

        let err: SpvError = ConfigError::Invalid("bad".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: Invalid configuration: bad");
    }
}
