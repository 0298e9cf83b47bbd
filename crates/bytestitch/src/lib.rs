//! Packet reassembly from fragmented byte streams.
//!
//! A [`Receiver`] owns the framing state for one logical stream and exposes
//! a single entry point, [`Receiver::receive`]. Feed it the stream's bytes
//! in whatever chunks the transport hands you — one byte at a time, many
//! frames at once, splits anywhere — and completed packets are delivered to
//! your [`PacketSink`] with framing bytes stripped.
//!
//! Two encodings share the stream: sentinel-prefixed length-framed binary
//! packets and `\r\n\r\n`-terminated text packets. See the
//! `bytestitch-frame` crate for the wire details.
//!
//! ```
//! use bytestitch::{Receiver, StoringSink};
//!
//! let mut receiver = Receiver::new(StoringSink::new());
//! receiver.receive(b"QWERTY\r\n").unwrap();
//! receiver.receive(b"\r\n").unwrap();
//! assert_eq!(receiver.sink().last_text().unwrap().as_ref(), b"QWERTY");
//! ```

pub mod receiver;
pub mod sink;

pub use bytestitch_frame::{
    ActiveFrame, FrameConfig, FrameError, Packet, PacketKind, Result, SENTINEL, TEXT_TERMINATOR,
};
pub use receiver::Receiver;
pub use sink::{PacketSink, StoringSink};
