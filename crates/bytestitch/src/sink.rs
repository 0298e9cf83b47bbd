use bytes::Bytes;

use bytestitch_frame::{Packet, PacketKind};

/// Receives completed packets from a [`Receiver`](crate::Receiver).
///
/// Callbacks run synchronously on the caller's thread, inside `receive`, in
/// the order frames complete. Payloads exclude all framing bytes.
pub trait PacketSink {
    /// A binary frame finished assembling.
    fn on_binary_packet(&mut self, payload: Bytes);

    /// A text frame finished assembling.
    fn on_text_packet(&mut self, payload: Bytes);
}

/// Sink that stores every delivered packet in arrival order.
///
/// Intended for tests and for hosts that want to poll rather than react.
#[derive(Debug, Default)]
pub struct StoringSink {
    packets: Vec<Packet>,
}

impl StoringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All packets delivered so far, oldest first.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// The most recently delivered binary payload, if any.
    pub fn last_binary(&self) -> Option<&Bytes> {
        self.last_of(PacketKind::Binary)
    }

    /// The most recently delivered text payload, if any.
    pub fn last_text(&self) -> Option<&Bytes> {
        self.last_of(PacketKind::Text)
    }

    fn last_of(&self, kind: PacketKind) -> Option<&Bytes> {
        self.packets
            .iter()
            .rev()
            .find(|packet| packet.kind == kind)
            .map(|packet| &packet.payload)
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }

    /// Consume the sink and return the stored packets.
    pub fn into_packets(self) -> Vec<Packet> {
        self.packets
    }
}

impl PacketSink for StoringSink {
    fn on_binary_packet(&mut self, payload: Bytes) {
        self.packets.push(Packet {
            kind: PacketKind::Binary,
            payload,
        });
    }

    fn on_text_packet(&mut self, payload: Bytes) {
        self.packets.push(Packet {
            kind: PacketKind::Text,
            payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_in_arrival_order() {
        let mut sink = StoringSink::new();
        sink.on_text_packet(Bytes::from_static(b"one"));
        sink.on_binary_packet(Bytes::from_static(b"two"));
        sink.on_text_packet(Bytes::from_static(b"three"));

        let kinds: Vec<_> = sink.packets().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            [PacketKind::Text, PacketKind::Binary, PacketKind::Text]
        );
        assert_eq!(sink.last_text().unwrap().as_ref(), b"three");
        assert_eq!(sink.last_binary().unwrap().as_ref(), b"two");
    }

    #[test]
    fn empty_sink_has_no_last_packets() {
        let sink = StoringSink::new();
        assert!(sink.is_empty());
        assert!(sink.last_binary().is_none());
        assert!(sink.last_text().is_none());
    }
}
