// UDP transmission of magic packets. Fire-and-forget: success means the
// datagram left the socket.

use super::{MAGIC_PACKET_LEN, WolError};
use crate::config::WolConfig;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::net::UdpSocket;

#[async_trait]
pub trait MagicPacketSender: Send + Sync {
    /// Send one packet, bound to `source` when given.
    async fn send(
        &self,
        packet: &[u8; MAGIC_PACKET_LEN],
        source: Option<Ipv4Addr>,
    ) -> Result<(), WolError>;
}

pub struct UdpMagicPacketSender {
    target: SocketAddrV4,
}

impl UdpMagicPacketSender {
    pub fn new(config: &WolConfig) -> Self {
        Self {
            target: SocketAddrV4::new(config.broadcast_address, config.port),
        }
    }
}

#[async_trait]
impl MagicPacketSender for UdpMagicPacketSender {
    async fn send(
        &self,
        packet: &[u8; MAGIC_PACKET_LEN],
        source: Option<Ipv4Addr>,
    ) -> Result<(), WolError> {
        let bind = SocketAddrV4::new(source.unwrap_or(Ipv4Addr::UNSPECIFIED), 0);
        let socket = UdpSocket::bind(bind).await?;
        socket.set_broadcast(true)?;
        let n = socket.send_to(packet, self.target).await?;
        if n != packet.len() {
            return Err(WolError::Transport(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short send: {} of {} bytes", n, packet.len()),
            )));
        }
        tracing::debug!(target_addr = %self.target, source = ?source, "magic packet sent");
        Ok(())
    }
}
