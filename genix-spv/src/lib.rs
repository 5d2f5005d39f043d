//! Genix SPV chain core.
//!
//! Per-network chain profiles and difficulty-transition anchoring for a lightweight
//! header synchronizer:
//!
//! - Network identity and discovery data (magic number, standard port, DNS seeds)
//! - Checkpoints that serve as partial-sync start points and transition anchors
//! - The per-network difficulty policy, which locates the previous transition boundary
//!   through hash-linked ancestors and hands it to the retarget primitive
//!
//! # Quick Start
//!
//! ```
//! use genix_spv::chain::profile_for;
//! use genix_spv::hashes::Hash;
//! use genix_spv::storage::MemoryAncestorStore;
//! use genix_spv::{BlockHash, HeaderRef, Network};
//!
//! let profile = profile_for(Network::Mainnet).unwrap();
//! assert_eq!(profile.standard_port, 43649);
//!
//! // The retarget arithmetic is supplied by the caller
//! let verify_target = |_: &HeaderRef, previous: Option<&HeaderRef>, _: u32| previous.is_some();
//!
//! let ancestors = MemoryAncestorStore::new();
//! let candidate = HeaderRef {
//!     height: 58383,
//!     hash: BlockHash::all_zeros(),
//!     prev_hash: profile.checkpoints[0].hash,
//!     timestamp: 1561717234,
//!     target: 0x1c065b71,
//! };
//! assert!(!profile.verify_difficulty(&candidate, &ancestors, &verify_target));
//! ```

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub mod chain;
pub mod client;
pub mod error;
pub mod logging;
pub mod storage;
pub mod types;
pub mod validation;

pub use bitcoin_hashes as hashes;
pub use chain::{ChainProfile, CheckPoint, DIFFICULTY_TRANSITION_INTERVAL, DifficultyPolicy};
pub use client::Config;
pub use error::{
    ConfigError, ConfigResult, LoggingError, LoggingResult, SpvError, ValidationError,
    ValidationResult,
};
pub use genix_network::{Network, UnknownNetwork};
pub use logging::{LogFileConfig, LoggingConfig, LoggingGuard, init_console_logging, init_logging};
pub use storage::AncestorStore;
pub use tracing::level_filters::LevelFilter;
pub use types::{BlockHash, HeaderRef};
pub use validation::{DifficultyAnchorResolver, HeaderValidator, TargetVerifier};

/// Current version of the genix-spv library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
