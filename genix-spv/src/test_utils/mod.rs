//! Test helpers: linked header chains, test doubles for the ancestor store and the target
//! primitive, and a log sink.

use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use bitcoin_hashes::Hash;
use tracing_subscriber::fmt::MakeWriter;

use crate::storage::AncestorStore;
use crate::types::{BlockHash, HeaderRef};
use crate::validation::TargetVerifier;

/// Block time of height 0 in generated chains.
pub const TEST_CHAIN_START_TIME: u32 = 1_550_000_000;
/// Seconds between generated blocks.
pub const TEST_BLOCK_SPACING: u32 = 120;
pub const TEST_TARGET: u32 = 0x1c065b71;

/// Deterministic hash for a generated header at `height`.
pub fn test_hash(height: u32) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&height.to_le_bytes());
    bytes[4] = 0x01;
    BlockHash::from_byte_array(bytes)
}

pub fn test_header(height: u32) -> HeaderRef {
    HeaderRef {
        height,
        hash: test_hash(height),
        prev_hash: test_hash(height.wrapping_sub(1)),
        timestamp: TEST_CHAIN_START_TIME + height * TEST_BLOCK_SPACING,
        target: TEST_TARGET,
    }
}

/// `count` hash-linked headers starting at `start_height`.
pub fn build_chain(start_height: u32, count: u32) -> Vec<HeaderRef> {
    (start_height..start_height + count).map(test_header).collect()
}

pub fn store_from(headers: &[HeaderRef]) -> HashMap<BlockHash, HeaderRef> {
    headers.iter().map(|header| (header.hash, *header)).collect()
}

/// Ancestor store that counts lookups.
#[derive(Debug, Default)]
pub struct CountingStore {
    headers: HashMap<BlockHash, HeaderRef>,
    lookups: Cell<usize>,
}

impl CountingStore {
    pub fn from_headers(headers: &[HeaderRef]) -> Self {
        Self {
            headers: store_from(headers),
            lookups: Cell::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl AncestorStore for CountingStore {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        self.lookups.set(self.lookups.get() + 1);
        self.headers.get(hash).copied()
    }
}

/// One call into the target primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyCall {
    pub header: HeaderRef,
    pub previous: Option<HeaderRef>,
    pub transition_time: u32,
}

/// Target primitive double that records its inputs and returns a fixed answer.
///
/// Clones share the same record.
#[derive(Debug, Clone)]
pub struct RecordingVerifier {
    result: bool,
    calls: Arc<Mutex<Vec<VerifyCall>>>,
}

impl RecordingVerifier {
    pub fn accepting() -> Self {
        Self::returning(true)
    }

    pub fn rejecting() -> Self {
        Self::returning(false)
    }

    pub fn returning(result: bool) -> Self {
        Self {
            result,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<VerifyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<VerifyCall> {
        self.calls.lock().unwrap().last().copied()
    }
}

impl TargetVerifier for RecordingVerifier {
    fn verify_target(
        &self,
        header: &HeaderRef,
        previous: Option<&HeaderRef>,
        transition_time: u32,
    ) -> bool {
        self.calls.lock().unwrap().push(VerifyCall {
            header: *header,
            previous: previous.copied(),
            transition_time,
        });
        self.result
    }
}

/// In-memory log sink for a scoped `tracing` subscriber. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
