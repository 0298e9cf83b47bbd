use bytestitch_frame::{ActiveFrame, FrameConfig, PacketKind, Result, StreamDemultiplexer};

use crate::sink::PacketSink;

/// Reassembles packets for one logical stream and hands them to a sink.
///
/// Owns all assembly state for its stream; nothing is shared between
/// instances, so unrelated streams can never corrupt each other.
/// `receive` performs no I/O and never suspends — "waiting for more data" is
/// simply returning with a frame still in flight, to be resumed by the next
/// call. Calls on one instance must be serialized by the caller.
pub struct Receiver<S> {
    demux: StreamDemultiplexer,
    sink: S,
}

impl<S: PacketSink> Receiver<S> {
    /// Create a receiver with default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, FrameConfig::default())
    }

    /// Create a receiver with explicit configuration.
    pub fn with_config(sink: S, config: FrameConfig) -> Self {
        Self {
            demux: StreamDemultiplexer::with_config(config),
            sink,
        }
    }

    /// Process one delivery of stream bytes.
    ///
    /// The chunk may split frames at any byte boundary and may contain any
    /// number of complete frames. Sink notifications happen synchronously
    /// inside this call, in the order frames complete. The chunk is fully
    /// consumed and not retained.
    ///
    /// On error the stream state has been reset; the caller chooses whether
    /// to resynchronize (keep calling `receive`) or drop the stream.
    pub fn receive(&mut self, chunk: &[u8]) -> Result<()> {
        let Self { demux, sink } = self;
        demux.feed(chunk, |packet| match packet.kind {
            PacketKind::Binary => sink.on_binary_packet(packet.payload),
            PacketKind::Text => sink.on_text_packet(packet.payload),
        })
    }

    /// True when no frame is in flight. A `false` at end of stream means the
    /// final frame never completed; whether that matters is up to the caller.
    pub fn is_idle(&self) -> bool {
        self.demux.is_idle()
    }

    /// Classification of the frame currently being assembled.
    pub fn active_frame(&self) -> ActiveFrame {
        self.demux.active_frame()
    }

    /// Current receiver configuration.
    pub fn config(&self) -> &FrameConfig {
        self.demux.config()
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the receiver and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
