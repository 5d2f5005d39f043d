//! Common type definitions for the Genix SPV chain core.

use bitcoin_hashes::{hash_newtype, sha256d};

hash_newtype! {
    /// A double-SHA256 block hash.
    ///
    /// Bytes are kept in internal order; `Display` and `FromStr` use the byte-reversed form
    /// that block explorers and node RPCs print.
    #[hash_newtype(backward)]
    pub struct BlockHash(sha256d::Hash);
}

/// The fields of an accepted or candidate block header that difficulty anchoring reads.
///
/// Header parsing and hashing belong to the header-sync engine; this is the view it hands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRef {
    pub height: u32,
    pub hash: BlockHash,
    pub prev_hash: BlockHash,
    /// Block time, unix seconds.
    pub timestamp: u32,
    /// Compact difficulty encoding of the target.
    pub target: u32,
}
