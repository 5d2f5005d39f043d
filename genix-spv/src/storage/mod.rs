//! Ancestor lookup used by difficulty anchoring.
//!
//! The header-sync engine owns and populates the store. Difficulty anchoring only reads it,
//! and treats every miss as "not available yet", so a store that is being extended
//! concurrently is fine.

mod memory;

pub use memory::MemoryAncestorStore;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::{BlockHash, HeaderRef};

/// Hash-indexed access to recently accepted headers.
///
/// Must cover at least the last [`DIFFICULTY_TRANSITION_INTERVAL`] accepted headers for the
/// transition-boundary walk to complete.
///
/// [`DIFFICULTY_TRANSITION_INTERVAL`]: crate::chain::DIFFICULTY_TRANSITION_INTERVAL
pub trait AncestorStore {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef>;
}

impl<S: AncestorStore + ?Sized> AncestorStore for &S {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        (**self).lookup(hash)
    }
}

impl<S: AncestorStore + ?Sized> AncestorStore for Arc<S> {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        (**self).lookup(hash)
    }
}

impl<S: AncestorStore + ?Sized> AncestorStore for RwLock<S> {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        match self.read() {
            Ok(store) => store.lookup(hash),
            Err(_) => {
                tracing::warn!("Ancestor store lock poisoned, treating {} as missing", hash);
                None
            }
        }
    }
}

impl AncestorStore for HashMap<BlockHash, HeaderRef> {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        self.get(hash).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tracing::level_filters::LevelFilter;

    use super::*;
    use crate::test_utils::{LogCapture, build_chain, store_from};

    #[test]
    fn test_shared_stores_delegate() {
        let chain = build_chain(5, 2);
        let store = Arc::new(RwLock::new(store_from(&chain)));

        assert_eq!(store.lookup(&chain[1].hash), Some(chain[1]));
        assert_eq!((&store).lookup(&chain[0].hash), Some(chain[0]));
    }

    #[test]
    fn test_poisoned_lock_reads_as_missing() {
        let chain = build_chain(5, 1);
        let store = Arc::new(RwLock::new(store_from(&chain)));

        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = poisoner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(store.is_poisoned());

        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(LevelFilter::WARN)
            .with_ansi(false)
            .finish();
        let found = tracing::subscriber::with_default(subscriber, || store.lookup(&chain[0].hash));

        assert_eq!(found, None);
        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Ancestor store lock poisoned"));
    }
}
