//! Difficulty-transition anchoring.
//!
//! Retargeting compares the time elapsed over the last transition interval against the
//! expected time. The arithmetic lives behind [`TargetVerifier`]; this module only locates its
//! inputs by walking the hash-linked ancestor chain.

use crate::chain::{DIFFICULTY_TRANSITION_INTERVAL, DifficultyPolicy};
use crate::storage::AncestorStore;
use crate::types::HeaderRef;

/// Transition time handed to the verifier when no boundary timestamp is available. The
/// verifier then checks the target against the non-transition rules only.
pub const NO_TRANSITION_TIME: u32 = 0;

/// The retarget primitive: accepts or rejects the encoded target of `header`.
///
/// `transition_time` is the timestamp of the block one full interval before `header` when
/// `header` sits on a transition boundary and that block is known, [`NO_TRANSITION_TIME`]
/// otherwise.
pub trait TargetVerifier {
    fn verify_target(
        &self,
        header: &HeaderRef,
        previous: Option<&HeaderRef>,
        transition_time: u32,
    ) -> bool;
}

impl<F> TargetVerifier for F
where
    F: Fn(&HeaderRef, Option<&HeaderRef>, u32) -> bool,
{
    fn verify_target(
        &self,
        header: &HeaderRef,
        previous: Option<&HeaderRef>,
        transition_time: u32,
    ) -> bool {
        self(header, previous, transition_time)
    }
}

/// Inputs located for the target primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyAnchor {
    /// Parent of the candidate header, `None` if the store does not know it.
    pub previous: Option<HeaderRef>,
    /// Block one transition interval back, found only for boundary headers with a complete
    /// window.
    pub transition_start: Option<HeaderRef>,
}

impl DifficultyAnchor {
    pub fn transition_time(&self) -> u32 {
        self.transition_start.map_or(NO_TRANSITION_TIME, |start| start.timestamp)
    }
}

/// Per-network difficulty check, chosen once from the profile.
///
/// Holds no mutable state, so one resolver can serve any number of validation workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyAnchorResolver {
    policy: DifficultyPolicy,
    interval: u32,
}

impl DifficultyAnchorResolver {
    pub fn new(policy: DifficultyPolicy) -> Self {
        Self {
            policy,
            interval: DIFFICULTY_TRANSITION_INTERVAL,
        }
    }

    pub fn is_transition_boundary(&self, height: u32) -> bool {
        height % self.interval == 0
    }

    /// Walks `interval` parent links back from `header`.
    ///
    /// Returns `None` as soon as a parent is missing, which means the window is incomplete
    /// (for example during partial sync), not that the header is invalid.
    pub fn find_transition_start<S>(&self, header: &HeaderRef, ancestors: &S) -> Option<HeaderRef>
    where
        S: AncestorStore + ?Sized,
    {
        let mut block = *header;
        for _ in 0..self.interval {
            block = ancestors.lookup(&block.prev_hash)?;
        }
        Some(block)
    }

    /// Locates the inputs for the target primitive.
    ///
    /// `None` means the policy needs no verification at all.
    pub fn resolve<S>(&self, header: &HeaderRef, ancestors: &S) -> Option<DifficultyAnchor>
    where
        S: AncestorStore + ?Sized,
    {
        match self.policy {
            DifficultyPolicy::AlwaysAccept => None,
            DifficultyPolicy::StandardPow => {
                let transition_start = if self.is_transition_boundary(header.height) {
                    let start = self.find_transition_start(header, ancestors);
                    if start.is_none() {
                        tracing::debug!(
                            "Incomplete transition window for header {} at height {}",
                            header.hash,
                            header.height
                        );
                    }
                    start
                } else {
                    None
                };

                Some(DifficultyAnchor {
                    previous: ancestors.lookup(&header.prev_hash),
                    transition_start,
                })
            }
        }
    }

    /// Accept or reject `header` under this network's policy.
    ///
    /// Never fails: an incomplete window degrades to [`NO_TRANSITION_TIME`]. A header whose
    /// parent is unknown is passed through with `previous = None`. Filtering those out is the
    /// caller's job, see [`HeaderValidator`](crate::validation::HeaderValidator).
    pub fn verify<S, V>(&self, header: &HeaderRef, ancestors: &S, verifier: &V) -> bool
    where
        S: AncestorStore + ?Sized,
        V: TargetVerifier + ?Sized,
    {
        let Some(anchor) = self.resolve(header, ancestors) else {
            return true;
        };

        if anchor.previous.is_none() {
            tracing::warn!(
                "Verifying difficulty of header {} at height {} without a known parent",
                header.hash,
                header.height
            );
        }

        let transition_time = anchor.transition_time();
        tracing::trace!(
            "Difficulty anchor for height {}: transition time {}",
            header.height,
            transition_time
        );
        verifier.verify_target(header, anchor.previous.as_ref(), transition_time)
    }
}
