// Host network interfaces (live, never persisted)

use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    /// First IPv4 address bound to the interface.
    pub ipv4: Option<Ipv4Addr>,
}
