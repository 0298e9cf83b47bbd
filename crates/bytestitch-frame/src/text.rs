use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::TEXT_TERMINATOR;
use crate::error::{FrameError, Result};

/// Prefix function of the terminator: for a match of length `k`, the longest
/// proper prefix of the terminator that is also a suffix of the matched
/// bytes. Indexed by `k`; entry 0 is unused.
const FALLBACK: [usize; 4] = [0, 0, 0, 1];

/// Accumulates one terminator-delimited text frame across fragmented
/// deliveries.
///
/// Scans for the four-byte `\r\n\r\n` terminator with an incremental
/// matcher, so a terminator split across any number of deliveries is still
/// found. Bytes provisionally held as a terminator prefix are released into
/// the payload the moment the match fails, falling back through the
/// terminator's prefix function so overlapping occurrences are not missed.
#[derive(Debug)]
pub struct TextFrameAssembler {
    payload: BytesMut,
    matched: usize,
    max_payload: Option<usize>,
}

impl TextFrameAssembler {
    /// Create an assembler with no payload size ceiling.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create an assembler that rejects payloads above `max_payload` bytes.
    pub fn with_limit(max_payload: Option<usize>) -> Self {
        Self {
            payload: BytesMut::new(),
            matched: 0,
            max_payload,
        }
    }

    /// Feed bytes from the stream.
    ///
    /// Returns how many bytes were consumed and at most one completed
    /// payload (the bytes preceding the terminator; the terminator itself is
    /// always consumed, never delivered). Bytes past a completed frame are
    /// left unconsumed. On error the assembler has reset itself.
    pub fn consume(&mut self, chunk: &[u8]) -> Result<(usize, Option<Bytes>)> {
        for (offset, &byte) in chunk.iter().enumerate() {
            self.step(byte)?;

            if self.matched == TEXT_TERMINATOR.len() {
                let payload = self.payload.split().freeze();
                trace!(len = payload.len(), "text frame complete");
                self.matched = 0;
                return Ok((offset + 1, Some(payload)));
            }
        }
        Ok((chunk.len(), None))
    }

    fn step(&mut self, byte: u8) -> Result<()> {
        loop {
            if byte == TEXT_TERMINATOR[self.matched] {
                self.matched += 1;
                return Ok(());
            }
            if self.matched == 0 {
                return self.push_payload(&[byte]);
            }

            // The held prefix was not the terminator after all. Keep the
            // longest tail that is still a terminator prefix and release the
            // rest as payload, then re-test this byte.
            let released = self.matched - FALLBACK[self.matched];
            self.matched = FALLBACK[self.matched];
            self.push_payload(&TEXT_TERMINATOR[..released])?;
        }
    }

    fn push_payload(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(max) = self.max_payload {
            let size = self.payload.len() + bytes.len();
            if size > max {
                self.reset();
                return Err(FrameError::PayloadTooLarge { size, max });
            }
        }
        self.payload.extend_from_slice(bytes);
        Ok(())
    }

    /// Discard all in-flight state.
    pub fn reset(&mut self) {
        self.payload.clear();
        self.matched = 0;
    }

    /// True when no frame is in flight.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty() && self.matched == 0
    }
}

impl Default for TextFrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
