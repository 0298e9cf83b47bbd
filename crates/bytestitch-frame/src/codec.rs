use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// First byte of every binary frame.
pub const SENTINEL: u8 = 0x24;

/// Four-byte sequence ending every text frame.
pub const TEXT_TERMINATOR: [u8; 4] = [0x0D, 0x0A, 0x0D, 0x0A];

/// Size of the binary frame length field.
pub const LEN_FIELD_SIZE: usize = 4;

/// Encode a binary frame length field.
///
/// Wire order is big-endian. The reference implementation reversed the four
/// received bytes and reinterpreted them in machine byte order through
/// overlapping storage; on a little-endian host that is exactly big-endian,
/// and this codec pins that order explicitly for every platform.
pub fn encode_len(len: u32) -> [u8; LEN_FIELD_SIZE] {
    len.to_be_bytes()
}

/// Decode a binary frame length field (big-endian, see [`encode_len`]).
pub fn decode_len(bytes: [u8; LEN_FIELD_SIZE]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Encode a binary frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬─────────────┬─────────────────┐
/// │ Sentinel     │ Length      │ Payload         │
/// │ 0x24 (1B)    │ (4B BE)     │ (Length bytes)  │
/// └──────────────┴─────────────┴─────────────────┘
/// ```
pub fn encode_binary_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(1 + LEN_FIELD_SIZE + payload.len());
    dst.put_u8(SENTINEL);
    dst.put_slice(&encode_len(payload.len() as u32));
    dst.put_slice(payload);
    Ok(())
}

/// Encode a text frame into the wire format: payload followed by the
/// four-byte terminator.
///
/// Rejects payloads that cannot survive a round trip: a payload containing
/// the terminator would end the frame early on the receiving side, and a
/// payload starting with the sentinel byte would be classified as binary.
pub fn encode_text_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.first() == Some(&SENTINEL)
        || payload
            .windows(TEXT_TERMINATOR.len())
            .any(|window| window == TEXT_TERMINATOR)
    {
        return Err(FrameError::UnrepresentableTextPayload);
    }
    dst.reserve(payload.len() + TEXT_TERMINATOR.len());
    dst.put_slice(payload);
    dst.put_slice(&TEXT_TERMINATOR);
    Ok(())
}

/// Configuration for frame reassembly.
///
/// The core enforces no size ceiling on its own; hosts exposed to untrusted
/// input should set both limits to bound buffering.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Maximum declared binary payload size in bytes. `None` means unbounded.
    pub max_binary_payload: Option<usize>,
    /// Maximum accumulated text payload size in bytes. `None` means unbounded.
    pub max_text_payload: Option<usize>,
}
