use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::{decode_len, LEN_FIELD_SIZE, SENTINEL};
use crate::error::{FrameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingSentinel,
    AwaitingLength,
    AwaitingPayload,
}

/// Accumulates one sentinel-prefixed binary frame across fragmented
/// deliveries.
///
/// Bytes may arrive in any split, down to one per call. The assembler owns
/// consuming the sentinel byte itself, so a demultiplexer only has to peek.
#[derive(Debug)]
pub struct BinaryFrameAssembler {
    phase: Phase,
    len_buf: [u8; LEN_FIELD_SIZE],
    len_filled: usize,
    needed: usize,
    payload: BytesMut,
    max_payload: Option<usize>,
}

impl BinaryFrameAssembler {
    /// Create an assembler with no payload size ceiling.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create an assembler that rejects declared lengths above `max_payload`.
    pub fn with_limit(max_payload: Option<usize>) -> Self {
        Self {
            phase: Phase::AwaitingSentinel,
            len_buf: [0; LEN_FIELD_SIZE],
            len_filled: 0,
            needed: 0,
            payload: BytesMut::new(),
            max_payload,
        }
    }

    /// Feed bytes from the stream.
    ///
    /// Returns how many bytes were consumed and at most one completed
    /// payload. Bytes past a completed frame are left unconsumed for the
    /// caller to reclassify. On error the assembler has reset itself.
    pub fn consume(&mut self, chunk: &[u8]) -> Result<(usize, Option<Bytes>)> {
        let mut cursor = 0usize;

        if self.phase == Phase::AwaitingSentinel {
            let Some(&first) = chunk.first() else {
                return Ok((0, None));
            };
            if first != SENTINEL {
                self.reset();
                return Err(FrameError::InvalidSentinel { found: first });
            }
            cursor += 1;
            self.phase = Phase::AwaitingLength;
        }

        if self.phase == Phase::AwaitingLength && cursor < chunk.len() {
            let take = (LEN_FIELD_SIZE - self.len_filled).min(chunk.len() - cursor);
            self.len_buf[self.len_filled..self.len_filled + take]
                .copy_from_slice(&chunk[cursor..cursor + take]);
            self.len_filled += take;
            cursor += take;

            if self.len_filled == LEN_FIELD_SIZE {
                let declared = decode_len(self.len_buf) as usize;
                if let Some(max) = self.max_payload {
                    if declared > max {
                        self.reset();
                        return Err(FrameError::PayloadTooLarge {
                            size: declared,
                            max,
                        });
                    }
                }
                self.needed = declared;
                self.phase = Phase::AwaitingPayload;
            }
        }

        if self.phase == Phase::AwaitingPayload {
            let take = self.needed.min(chunk.len() - cursor);
            self.payload.extend_from_slice(&chunk[cursor..cursor + take]);
            self.needed -= take;
            cursor += take;

            // A zero-length frame completes the instant the length decodes.
            if self.needed == 0 {
                let payload = self.payload.split().freeze();
                trace!(len = payload.len(), "binary frame complete");
                self.reset();
                return Ok((cursor, Some(payload)));
            }
        }

        Ok((cursor, None))
    }

    /// Discard all in-flight state.
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitingSentinel;
        self.len_buf = [0; LEN_FIELD_SIZE];
        self.len_filled = 0;
        self.needed = 0;
        self.payload.clear();
    }

    /// True when no frame is in flight.
    pub fn is_empty(&self) -> bool {
        self.phase == Phase::AwaitingSentinel
    }
}

impl Default for BinaryFrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
