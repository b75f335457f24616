// Wake-on-LAN: magic packet construction, UDP transmission and the wake flow.

mod sender;
mod service;

pub use sender::{MagicPacketSender, UdpMagicPacketSender};
pub use service::{WakeOutcome, WakeService};

pub use macaddr::MacAddr6;
use std::str::FromStr;

/// 6 sync bytes plus 16 copies of a 6-byte MAC.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

#[derive(Debug, thiserror::Error)]
pub enum WolError {
    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),
    #[error("interface lookup failed: {0}")]
    InterfaceLookup(String),
    #[error("send failed: {0}")]
    Transport(#[from] std::io::Error),
}

/// Parse `AA:BB:CC:DD:EE:FF`, `AA-BB-CC-DD-EE-FF`, `AABB.CCDD.EEFF` or bare hex.
pub fn parse_mac(s: &str) -> Result<MacAddr6, WolError> {
    let trimmed = s.trim();
    let parsed = if trimmed.len() == 12 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut bytes = [0u8; 6];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = u8::from_str_radix(&trimmed[i * 2..i * 2 + 2], 16)
                .map_err(|_| WolError::InvalidMac(s.to_string()))?;
        }
        Ok(MacAddr6::from(bytes))
    } else {
        MacAddr6::from_str(trimmed)
    };
    parsed.map_err(|_| WolError::InvalidMac(s.to_string()))
}

pub fn magic_packet(mac: MacAddr6) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(mac.as_bytes());
    }
    packet
}
