//! Chain parameters: per-network profiles and checkpoints.

pub mod checkpoints;
pub mod params;

pub use checkpoints::{
    CheckPoint, CheckpointManager, DIFFICULTY_TRANSITION_INTERVAL, check_checkpoint_table,
};
pub use params::{
    BurnAddresses, BurnAmounts, COIN, ChainProfile, DifficultyPolicy, profile_for,
    profile_for_name,
};
