//! Checkpoints are hardcoded blocks at difficulty-transition boundaries.
//!
//! They serve two purposes: trust anchors for partial header downloads (sync starts from the
//! newest checkpoint at or below a requested height) and literal transition references when
//! verifying the difficulty of the transition that follows them.

use crate::chain::ChainProfile;
use crate::error::{CheckpointTableError, ConfigError, ConfigResult};
use crate::types::BlockHash;

/// Number of blocks between two difficulty retargets.
pub const DIFFICULTY_TRANSITION_INTERVAL: u32 = 2016;

/// A block known in advance to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPoint {
    pub height: u32,
    pub hash: BlockHash,
    /// Block time, unix seconds.
    pub timestamp: u32,
    /// Compact difficulty encoding of the block target.
    pub target: u32,
}

impl CheckPoint {
    pub fn new(height: u32, hash: BlockHash, timestamp: u32, target: u32) -> Self {
        Self {
            height,
            hash,
            timestamp,
            target,
        }
    }

    /// Whether the checkpoint sits on a difficulty-transition boundary.
    pub fn is_transition_boundary(&self) -> bool {
        self.height % DIFFICULTY_TRANSITION_INTERVAL == 0
    }
}

/// Checks that a checkpoint table can be used as a set of transition anchors.
///
/// Heights must be strictly ascending, and every checkpoint that is followed by a newer one
/// must sit on a transition boundary. The newest entry only marks where partial sync may
/// start and is not required to be aligned.
pub fn check_checkpoint_table(checkpoints: &[CheckPoint]) -> Result<(), CheckpointTableError> {
    for pair in checkpoints.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if previous.height >= current.height {
            return Err(CheckpointTableError::NotAscending {
                previous: previous.height,
                height: current.height,
            });
        }
        if !previous.is_transition_boundary() {
            return Err(CheckpointTableError::Misaligned {
                height: previous.height,
                interval: DIFFICULTY_TRANSITION_INTERVAL,
            });
        }
    }
    Ok(())
}

/// Lookup over a network's checkpoints, used to pick partial-sync start points.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    // sorted by height, lowest first
    checkpoints: Vec<CheckPoint>,
}

impl CheckpointManager {
    /// Builds a manager over a table, rejecting tables that fail [`check_checkpoint_table`].
    pub fn new(checkpoints: Vec<CheckPoint>) -> Result<Self, CheckpointTableError> {
        check_checkpoint_table(&checkpoints)?;
        Ok(Self {
            checkpoints,
        })
    }

    /// Manager over a profile's checkpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCheckpoints`] if the profile's table fails
    /// [`check_checkpoint_table`].
    pub fn for_profile(profile: &ChainProfile) -> ConfigResult<Self> {
        Self::new(profile.checkpoints.clone()).map_err(|source| ConfigError::InvalidCheckpoints {
            network: profile.network,
            source,
        })
    }

    pub fn checkpoints(&self) -> &[CheckPoint] {
        &self.checkpoints
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Newest checkpoint overall.
    pub fn last_checkpoint(&self) -> Option<&CheckPoint> {
        self.checkpoints.last()
    }

    /// Get the last checkpoint at or before the given height.
    ///
    /// `None` when every checkpoint is above `height` or there are no checkpoints at all.
    pub fn last_checkpoint_before_height(&self, height: u32) -> Option<&CheckPoint> {
        match self.checkpoints.binary_search_by_key(&height, |checkpoint| checkpoint.height) {
            Ok(index) => Some(&self.checkpoints[index]),
            Err(0) => None,
            Err(index) => Some(&self.checkpoints[index - 1]),
        }
    }

    /// Get the newest checkpoint whose block time is at or before `timestamp`.
    pub fn last_checkpoint_before_timestamp(&self, timestamp: u32) -> Option<&CheckPoint> {
        self.checkpoints.iter().rev().find(|checkpoint| checkpoint.timestamp <= timestamp)
    }

    pub fn checkpoint_at_height(&self, height: u32) -> Option<&CheckPoint> {
        self.checkpoints
            .binary_search_by_key(&height, |checkpoint| checkpoint.height)
            .ok()
            .map(|index| &self.checkpoints[index])
    }

    /// A header at a checkpoint height must carry the checkpoint hash. Heights without a
    /// checkpoint always match.
    pub fn matches_checkpoint(&self, height: u32, hash: &BlockHash) -> bool {
        match self.checkpoint_at_height(height) {
            Some(checkpoint) => checkpoint.hash == *hash,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bitcoin_hashes::Hash;
    use genix_network::Network;

    use super::*;

    fn checkpoint(height: u32, timestamp: u32) -> CheckPoint {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&height.to_le_bytes());
        CheckPoint::new(height, BlockHash::from_byte_array(bytes), timestamp, 0x1d00ffff)
    }

    fn manager(heights: &[u32]) -> CheckpointManager {
        let checkpoints =
            heights.iter().map(|height| checkpoint(*height, 1_500_000_000 + *height)).collect();
        CheckpointManager::new(checkpoints).unwrap()
    }

    #[test]
    fn test_empty_and_single_tables_pass() {
        assert_eq!(check_checkpoint_table(&[]), Ok(()));
        assert_eq!(check_checkpoint_table(&[checkpoint(58382, 0)]), Ok(()));
    }

    #[test]
    fn test_checkpoints_must_be_ascending() {
        let table = [checkpoint(0, 0), checkpoint(4032, 0), checkpoint(2016, 0)];
        assert_eq!(
            check_checkpoint_table(&table),
            Err(CheckpointTableError::NotAscending {
                previous: 4032,
                height: 2016
            })
        );

        let duplicated = [checkpoint(2016, 0), checkpoint(2016, 0)];
        assert!(matches!(
            check_checkpoint_table(&duplicated),
            Err(CheckpointTableError::NotAscending { .. })
        ));
    }

    #[test]
    fn test_older_checkpoints_must_be_aligned() {
        let table = [checkpoint(13205, 0), checkpoint(26410, 0)];
        assert_eq!(
            check_checkpoint_table(&table),
            Err(CheckpointTableError::Misaligned {
                height: 13205,
                interval: DIFFICULTY_TRANSITION_INTERVAL
            })
        );
    }

    #[test]
    fn test_newest_checkpoint_may_be_unaligned() {
        let table = [checkpoint(0, 0), checkpoint(2016, 0), checkpoint(58382, 0)];
        assert_eq!(check_checkpoint_table(&table), Ok(()));
    }

    #[test]
    fn test_manager_rejects_bad_table() {
        let result = CheckpointManager::new(vec![checkpoint(10, 0), checkpoint(2016, 0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_last_checkpoint_before_height() {
        let manager = manager(&[0, 2016, 20160, 58380]);

        assert_eq!(manager.last_checkpoint_before_height(0).unwrap().height, 0);
        assert_eq!(manager.last_checkpoint_before_height(2015).unwrap().height, 0);
        assert_eq!(manager.last_checkpoint_before_height(2016).unwrap().height, 2016);
        assert_eq!(manager.last_checkpoint_before_height(30000).unwrap().height, 20160);
        assert_eq!(manager.last_checkpoint_before_height(u32::MAX).unwrap().height, 58380);
    }

    #[test]
    fn test_last_checkpoint_before_height_below_first() {
        let manager = manager(&[2016, 4032]);
        assert!(manager.last_checkpoint_before_height(100).is_none());
    }

    #[test]
    fn test_no_checkpoints_means_no_anchor() {
        let manager = CheckpointManager::new(Vec::new()).unwrap();
        assert!(manager.is_empty());
        assert!(manager.last_checkpoint().is_none());
        assert!(manager.last_checkpoint_before_height(1_000_000).is_none());
        assert!(manager.last_checkpoint_before_timestamp(u32::MAX).is_none());
    }

    #[test]
    fn test_checkpoint_by_timestamp() {
        let manager = manager(&[0, 2016, 4032]);

        assert!(manager.last_checkpoint_before_timestamp(1_000).is_none());
        assert_eq!(manager.last_checkpoint_before_timestamp(1_500_000_000).unwrap().height, 0);
        assert_eq!(manager.last_checkpoint_before_timestamp(1_500_003_000).unwrap().height, 2016);
        assert_eq!(manager.last_checkpoint_before_timestamp(u32::MAX).unwrap().height, 4032);
    }

    #[test]
    fn test_matches_checkpoint() {
        let manager = manager(&[0, 2016]);
        let expected = manager.checkpoint_at_height(2016).unwrap().hash;

        assert!(manager.matches_checkpoint(2016, &expected));
        assert!(!manager.matches_checkpoint(2016, &BlockHash::all_zeros()));
        assert!(manager.matches_checkpoint(2017, &BlockHash::all_zeros()));
    }

    #[test]
    fn test_for_profile_reports_broken_table() {
        let profile = ChainProfile {
            checkpoints: vec![checkpoint(100, 0), checkpoint(2016, 0)],
            ..ChainProfile::mainnet()
        };

        assert_matches!(
            CheckpointManager::for_profile(&profile),
            Err(ConfigError::InvalidCheckpoints {
                network: Network::Mainnet,
                source: CheckpointTableError::Misaligned { height: 100, .. },
            })
        );
    }

    #[test]
    fn test_for_profile_copies_table() {
        let profile = ChainProfile::testnet();
        let manager = CheckpointManager::for_profile(&profile).unwrap();
        assert_eq!(manager.checkpoints(), profile.checkpoints.as_slice());
    }
}
