use bytes::Bytes;
use tracing::debug;

use crate::binary::BinaryFrameAssembler;
use crate::codec::{FrameConfig, SENTINEL};
use crate::error::Result;
use crate::text::TextFrameAssembler;

/// The encoding a completed packet arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Binary,
    Text,
}

/// A completed packet with all framing bytes stripped.
#[derive(Debug, Clone)]
pub struct Packet {
    pub kind: PacketKind,
    pub payload: Bytes,
}

/// Classification of the in-flight frame, persisted across deliveries.
///
/// A non-`Idle` value after the stream ends means the final frame never
/// completed; whether that is a protocol violation is the caller's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFrame {
    #[default]
    Idle,
    Binary,
    Text,
}

/// Routes stream bytes to the matching frame assembler.
///
/// At each frame boundary the first byte classifies the frame: the sentinel
/// (`0x24`) starts a binary frame, anything else starts a text frame and is
/// itself payload. A single delivery may complete any number of frames of
/// either kind.
#[derive(Debug)]
pub struct StreamDemultiplexer {
    active: ActiveFrame,
    binary: BinaryFrameAssembler,
    text: TextFrameAssembler,
    config: FrameConfig,
}

impl StreamDemultiplexer {
    /// Create a demultiplexer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a demultiplexer with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            active: ActiveFrame::Idle,
            binary: BinaryFrameAssembler::with_limit(config.max_binary_payload),
            text: TextFrameAssembler::with_limit(config.max_text_payload),
            config,
        }
    }

    /// Process one delivery, invoking `emit` for every frame it completes,
    /// in completion order. An empty chunk is a no-op.
    ///
    /// On error all assembly state has been reset; the next delivery starts
    /// a fresh frame at its first byte.
    pub fn feed<F>(&mut self, chunk: &[u8], mut emit: F) -> Result<()>
    where
        F: FnMut(Packet),
    {
        let mut cursor = 0usize;
        while cursor < chunk.len() {
            if self.active == ActiveFrame::Idle {
                self.active = if chunk[cursor] == SENTINEL {
                    ActiveFrame::Binary
                } else {
                    ActiveFrame::Text
                };
                debug!(kind = ?self.active, "classified new frame");
            }

            let rest = &chunk[cursor..];
            let result = if self.active == ActiveFrame::Binary {
                self.binary.consume(rest)
            } else {
                self.text.consume(rest)
            };
            let (consumed, completed) = match result {
                Ok(step) => step,
                Err(err) => {
                    debug!(error = %err, "framing error, resetting stream state");
                    self.reset();
                    return Err(err);
                }
            };
            cursor += consumed;

            if let Some(payload) = completed {
                let kind = if self.active == ActiveFrame::Binary {
                    PacketKind::Binary
                } else {
                    PacketKind::Text
                };
                self.active = ActiveFrame::Idle;
                emit(Packet { kind, payload });
            }
        }
        Ok(())
    }

    /// True when no frame is in flight.
    pub fn is_idle(&self) -> bool {
        self.active == ActiveFrame::Idle
    }

    /// Classification of the frame currently being assembled.
    pub fn active_frame(&self) -> ActiveFrame {
        self.active
    }

    /// Current demultiplexer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Discard all in-flight state and return to `Idle`.
    pub fn reset(&mut self) {
        self.active = ActiveFrame::Idle;
        self.binary.reset();
        self.text.reset();
    }
}

impl Default for StreamDemultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::codec::{encode_binary_frame, encode_text_frame};
    use crate::error::FrameError;

    fn collect(demux: &mut StreamDemultiplexer, chunk: &[u8]) -> Vec<Packet> {
        let mut packets = Vec::new();
        demux.feed(chunk, |packet| packets.push(packet)).unwrap();
        packets
    }

    #[test]
    fn classifies_binary_by_sentinel() {
        let mut wire = BytesMut::new();
        encode_binary_frame(b"QWERTY", &mut wire).unwrap();

        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, &wire);

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].kind, PacketKind::Binary);
        assert_eq!(packets[0].payload.as_ref(), b"QWERTY");
        assert!(demux.is_idle());
    }

    #[test]
    fn classifies_text_by_any_other_byte() {
        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, b"QWERTY\r\n\r\n");

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].kind, PacketKind::Text);
        assert_eq!(packets[0].payload.as_ref(), b"QWERTY");
    }

    #[test]
    fn first_text_byte_is_payload_not_discarded() {
        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, b"Q\r\n\r\n");
        assert_eq!(packets[0].payload.as_ref(), b"Q");
    }

    #[test]
    fn two_text_frames_in_one_delivery() {
        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, b"QWERTY\r\n\r\nHESOYAM\r\n\r\n");

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].payload.as_ref(), b"QWERTY");
        assert_eq!(packets[1].payload.as_ref(), b"HESOYAM");
    }

    #[test]
    fn text_then_binary_in_one_delivery() {
        let mut wire = BytesMut::new();
        encode_text_frame(b"hello", &mut wire).unwrap();
        encode_binary_frame(b"world", &mut wire).unwrap();

        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, &wire);

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].kind, PacketKind::Text);
        assert_eq!(packets[0].payload.as_ref(), b"hello");
        assert_eq!(packets[1].kind, PacketKind::Binary);
        assert_eq!(packets[1].payload.as_ref(), b"world");
    }

    #[test]
    fn binary_then_text_split_mid_frames() {
        let mut wire = BytesMut::new();
        encode_binary_frame(b"QWERTY", &mut wire).unwrap();
        encode_text_frame(b"HESOYAM", &mut wire).unwrap();

        let mut demux = StreamDemultiplexer::new();
        let mut packets = Vec::new();
        for chunk in wire.chunks(3) {
            demux.feed(chunk, |packet| packets.push(packet)).unwrap();
        }

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].kind, PacketKind::Binary);
        assert_eq!(packets[0].payload.as_ref(), b"QWERTY");
        assert_eq!(packets[1].kind, PacketKind::Text);
        assert_eq!(packets[1].payload.as_ref(), b"HESOYAM");
    }

    #[test]
    fn empty_delivery_is_noop() {
        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, &[]);
        assert!(packets.is_empty());
        assert!(demux.is_idle());
    }

    #[test]
    fn classification_persists_across_deliveries() {
        let mut demux = StreamDemultiplexer::new();
        let _ = collect(&mut demux, &[SENTINEL]);
        assert_eq!(demux.active_frame(), ActiveFrame::Binary);

        let _ = collect(&mut demux, b"partial text");
        assert_eq!(demux.active_frame(), ActiveFrame::Binary);
    }

    #[test]
    fn error_resets_to_idle() {
        let config = FrameConfig {
            max_binary_payload: Some(8),
            ..FrameConfig::default()
        };
        let mut wire = BytesMut::new();
        encode_binary_frame(&[0u8; 64], &mut wire).unwrap();

        let mut demux = StreamDemultiplexer::with_config(config);
        let err = demux.feed(&wire, |_| {}).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(demux.is_idle());

        // The stream is usable again once the caller resynchronizes.
        let packets = collect(&mut demux, b"ok\r\n\r\n");
        assert_eq!(packets[0].payload.as_ref(), b"ok");
    }

    #[test]
    fn zero_length_binary_frame_between_text_frames() {
        let mut wire = BytesMut::new();
        encode_text_frame(b"a", &mut wire).unwrap();
        encode_binary_frame(b"", &mut wire).unwrap();
        encode_text_frame(b"b", &mut wire).unwrap();

        let mut demux = StreamDemultiplexer::new();
        let packets = collect(&mut demux, &wire);

        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].kind, PacketKind::Text);
        assert_eq!(packets[1].kind, PacketKind::Binary);
        assert!(packets[1].payload.is_empty());
        assert_eq!(packets[2].kind, PacketKind::Text);
        assert_eq!(packets[2].payload.as_ref(), b"b");
    }
}
