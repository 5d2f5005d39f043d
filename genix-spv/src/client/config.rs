//! Configuration for a Genix SPV session.

use std::path::PathBuf;

use genix_network::Network;
use tracing::level_filters::LevelFilter;

use crate::chain::{ChainProfile, CheckPoint, CheckpointManager, profile_for};
use crate::error::{ConfigError, ConfigResult};
use crate::logging::{LogFileConfig, LoggingConfig};

/// Archived log files kept by default.
const DEFAULT_MAX_LOG_FILES: usize = 20;

/// Configuration for one SPV session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Network to join.
    pub network: Network,

    /// Start syncing from a specific block height.
    /// The session starts at the nearest checkpoint at or before this height.
    pub start_from_height: Option<u32>,

    pub log_level: LevelFilter,

    /// Directory for log files. Console-only logging when unset.
    pub log_dir: Option<PathBuf>,

    /// Archived log files to keep in `log_dir`.
    pub max_log_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            start_from_height: None,
            log_level: LevelFilter::INFO,
            log_dir: None,
            max_log_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl Config {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    pub fn mainnet() -> Self {
        Self::new(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::new(Network::Testnet)
    }

    pub fn regtest() -> Self {
        Self::new(Network::Regtest)
    }

    /// Set the starting height for synchronization.
    pub fn with_start_height(mut self, height: u32) -> Self {
        self.start_from_height = Some(height);
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Profile of the configured network, with its checkpoint table checked.
    pub fn profile(&self) -> ConfigResult<ChainProfile> {
        profile_for(self.network)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.profile()?;

        if self.log_dir.is_some() && self.max_log_files == 0 {
            return Err(ConfigError::Invalid(
                "max_log_files must be > 0 when file logging is enabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Checkpoint to start partial header sync from.
    ///
    /// The newest checkpoint at or below `start_from_height`, or the newest checkpoint overall
    /// when no height is set. `None` when no checkpoint qualifies, in which case the session
    /// syncs from genesis.
    pub fn sync_start(&self) -> ConfigResult<Option<CheckPoint>> {
        let checkpoints = CheckpointManager::for_profile(&self.profile()?)?;
        let start = match self.start_from_height {
            Some(height) => checkpoints.last_checkpoint_before_height(height),
            None => checkpoints.last_checkpoint(),
        };
        Ok(start.copied())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: Some(self.log_level),
            console: true,
            file: self.log_dir.as_ref().map(|dir| LogFileConfig {
                log_dir: dir.clone(),
                network: self.network,
                max_files: self.max_log_files,
            }),
        }
    }
}
