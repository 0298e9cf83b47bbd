/// Errors that can occur while reassembling frames from a byte stream.
///
/// Every variant is recoverable: the assembler that produced it has already
/// reset itself, and the caller decides whether to resynchronize the stream
/// or drop it.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A binary frame did not start with the sentinel byte.
    #[error("invalid sentinel byte 0x{found:02X} (expected 0x24)")]
    InvalidSentinel { found: u8 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A text payload that cannot survive a wire round trip (contains the
    /// terminator, or starts with the binary sentinel).
    #[error("text payload not representable on the wire")]
    UnrepresentableTextPayload,
}

pub type Result<T> = std::result::Result<T, FrameError>;
