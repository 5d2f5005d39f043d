use crate::chain::{ChainProfile, CheckpointManager};
use crate::error::{ValidationError, ValidationResult};
use crate::storage::AncestorStore;
use crate::types::HeaderRef;
use crate::validation::difficulty::{DifficultyAnchorResolver, TargetVerifier};
use crate::validation::Validator;

/// Strict header check run by the sync engine before extending its best chain.
///
/// This layer owns the parent-known precondition: a header whose parent is not in the
/// ancestor store is rejected with [`ValidationError::MissingParent`] before the difficulty
/// policy runs. A `false` from the target primitive becomes
/// [`ValidationError::DifficultyMismatch`].
pub struct HeaderValidator<'a, S: ?Sized, V> {
    resolver: DifficultyAnchorResolver,
    checkpoints: Option<&'a CheckpointManager>,
    ancestors: &'a S,
    verifier: V,
}

impl<'a, S, V> HeaderValidator<'a, S, V>
where
    S: AncestorStore + ?Sized,
    V: TargetVerifier,
{
    pub fn new(profile: &ChainProfile, ancestors: &'a S, verifier: V) -> Self {
        Self {
            resolver: profile.difficulty_resolver(),
            checkpoints: None,
            ancestors,
            verifier,
        }
    }

    /// Also reject headers that sit at a checkpoint height with a different hash.
    pub fn with_checkpoints(mut self, checkpoints: &'a CheckpointManager) -> Self {
        self.checkpoints = Some(checkpoints);
        self
    }
}

impl<S, V> Validator<&HeaderRef> for HeaderValidator<'_, S, V>
where
    S: AncestorStore + ?Sized,
    V: TargetVerifier,
{
    fn validate(&self, header: &HeaderRef) -> ValidationResult<()> {
        if self.ancestors.lookup(&header.prev_hash).is_none() {
            return Err(ValidationError::MissingParent(header.prev_hash));
        }

        if let Some(checkpoints) = self.checkpoints {
            if !checkpoints.matches_checkpoint(header.height, &header.hash) {
                return Err(ValidationError::CheckpointMismatch {
                    height: header.height,
                    hash: header.hash,
                });
            }
        }

        if !self.resolver.verify(header, self.ancestors, &self.verifier) {
            return Err(ValidationError::DifficultyMismatch {
                height: header.height,
                hash: header.hash,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bitcoin_hashes::Hash;

    use super::*;
    use crate::chain::CheckPoint;
    use crate::storage::MemoryAncestorStore;
    use crate::test_utils::{RecordingVerifier, build_chain};
    use crate::types::BlockHash;

    #[test]
    fn test_missing_parent_is_rejected_before_policy() {
        let chain = build_chain(10, 2);
        let store = MemoryAncestorStore::new();
        let verifier = RecordingVerifier::accepting();

        let validator = HeaderValidator::new(&ChainProfile::mainnet(), &store, verifier.clone());
        assert_matches!(
            validator.validate(&chain[1]),
            Err(ValidationError::MissingParent(hash)) if hash == chain[0].hash
        );
        assert!(verifier.calls().is_empty());

        // even the permissive policy needs a known parent here
        let validator = HeaderValidator::new(&ChainProfile::regtest(), &store, verifier.clone());
        assert_matches!(validator.validate(&chain[1]), Err(ValidationError::MissingParent(_)));
    }

    #[test]
    fn test_difficulty_mismatch() {
        let chain = build_chain(10, 2);
        let mut store = MemoryAncestorStore::new();
        store.insert(chain[0]);

        let mainnet = ChainProfile::mainnet();
        let validator = HeaderValidator::new(&mainnet, &store, RecordingVerifier::rejecting());
        assert_matches!(
            validator.validate(&chain[1]),
            Err(ValidationError::DifficultyMismatch { height: 11, .. })
        );
    }

    #[test]
    fn test_accepts_attached_header() {
        let chain = build_chain(10, 2);
        let mut store = MemoryAncestorStore::new();
        store.insert(chain[0]);
        let verifier = RecordingVerifier::accepting();

        let validator = HeaderValidator::new(&ChainProfile::mainnet(), &store, verifier.clone());
        assert!(validator.validate(&chain[1]).is_ok());
        assert_eq!(verifier.calls().len(), 1);
    }

    #[test]
    fn test_checkpoint_mismatch() {
        let chain = build_chain(2015, 2);
        let mut store = MemoryAncestorStore::new();
        store.insert(chain[0]);

        let mut wrong = chain[1];
        wrong.hash = BlockHash::all_zeros();
        let checkpoints = CheckpointManager::new(vec![CheckPoint::new(
            2016,
            chain[1].hash,
            chain[1].timestamp,
            chain[1].target,
        )])
        .unwrap();

        let regtest = ChainProfile::regtest();
        let validator = HeaderValidator::new(&regtest, &store, RecordingVerifier::accepting())
            .with_checkpoints(&checkpoints);
        assert!(validator.validate(&chain[1]).is_ok());
        assert_matches!(
            validator.validate(&wrong),
            Err(ValidationError::CheckpointMismatch { height: 2016, .. })
        );
    }
}
