pub mod id;
pub mod protocol;

pub use id::{PacketIdSource, RandomIds, SequentialIds};
pub use protocol::{PacketType, ParseProtocolError, Protocol};

use chrono::{DateTime, Local};
use std::fmt;

pub const DEFAULT_TTL: u8 = 64;

/// シミュレーション上の1リクエスト/レスポンス。生成後は変更しない
#[derive(Debug, Clone)]
pub struct Packet {
    id: u32,
    source_ip: String,
    destination_ip: String,
    payload: String,
    protocol: Protocol,
    packet_type: PacketType,
    timestamp: DateTime<Local>,
    ttl: u8,
}

impl Packet {
    pub fn new(
        id: u32,
        source_ip: impl Into<String>,
        destination_ip: impl Into<String>,
        payload: impl Into<String>,
        protocol: Protocol,
    ) -> Self {
        Self {
            id,
            source_ip: source_ip.into(),
            destination_ip: destination_ip.into(),
            payload: payload.into(),
            protocol,
            packet_type: PacketType::Request,
            timestamp: Local::now(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_packet_type(mut self, packet_type: PacketType) -> Self {
        self.packet_type = packet_type;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn source_ip(&self) -> &str {
        &self.source_ip
    }

    pub fn destination_ip(&self) -> &str {
        &self.destination_ip
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// ペイロード長から常に導出する
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.payload.chars().take(20).collect();
        write!(
            f,
            "[PACKET {}] {} | {:15} -> {:15} | {:5} | {}...",
            self.id,
            self.timestamp.format("%H:%M:%S%.3f"),
            self.source_ip,
            self.destination_ip,
            self.protocol,
            preview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_follows_payload() {
        let packet = Packet::new(1, "192.168.0.1", "192.168.1.1", "Request for google.com", Protocol::Http);
        assert_eq!(packet.size(), "Request for google.com".len());
        assert_eq!(packet.ttl(), DEFAULT_TTL);
        assert_eq!(packet.packet_type(), PacketType::Request);
    }

    #[test]
    fn packet_type_can_be_tagged_as_response() {
        let packet = Packet::new(7, "192.168.1.1", "192.168.0.1", "200 OK", Protocol::Https)
            .with_packet_type(PacketType::Response);
        assert_eq!(packet.packet_type(), PacketType::Response);
        assert_eq!(packet.protocol(), Protocol::Https);
        assert_eq!(packet.size(), 6);
    }

    #[test]
    fn summary_pads_protocol_column() {
        let packet = Packet::new(1, "10.0.0.1", "10.0.0.2", "x", Protocol::Ftp);
        assert!(packet.to_string().contains("| FTP   |"));
    }

    #[test]
    fn summary_truncates_payload() {
        let packet = Packet::new(4242, "10.0.0.1", "10.0.0.2", "abcdefghijklmnopqrstuvwxyz", Protocol::Ftp);
        let line = packet.to_string();
        assert!(line.starts_with("[PACKET 4242]"));
        assert!(line.contains("abcdefghijklmnopqrst..."));
        assert!(!line.contains("uvwxyz"));
    }
}
