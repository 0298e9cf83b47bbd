//! Incremental packet framing for mixed binary/text byte streams.
//!
//! Reconstructs discrete packets from a byte stream delivered in arbitrarily
//! sized, arbitrarily split chunks. Two encodings share the stream:
//! - Binary frame: a `0x24` sentinel, a 4-byte big-endian length, then that
//!   many payload bytes.
//! - Text frame: payload bytes ended by `\r\n\r\n`.
//!
//! Any fragmentation is handled, down to one byte per delivery, and a single
//! delivery may complete several frames of either kind. All state lives in
//! the [`StreamDemultiplexer`] instance; nothing is shared between streams.

pub mod binary;
pub mod codec;
pub mod demux;
pub mod error;
pub mod text;

pub use binary::BinaryFrameAssembler;
pub use codec::{
    decode_len, encode_binary_frame, encode_len, encode_text_frame, FrameConfig, LEN_FIELD_SIZE,
    SENTINEL, TEXT_TERMINATOR,
};
pub use demux::{ActiveFrame, Packet, PacketKind, StreamDemultiplexer};
pub use error::{FrameError, Result};
pub use text::TextFrameAssembler;
