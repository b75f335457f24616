// Host network interfaces via sysinfo. Enumerated fresh on every call.

use crate::models::NetworkInterface;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use sysinfo::Networks;
use tracing::instrument;

#[async_trait]
pub trait InterfaceSource: Send + Sync {
    /// All interfaces, sorted by name.
    async fn list(&self) -> anyhow::Result<Vec<NetworkInterface>>;

    /// First IPv4 address of `name`; `None` when the interface is gone or has no IPv4.
    async fn resolve_ipv4(&self, name: &str) -> anyhow::Result<Option<Ipv4Addr>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|i| i.name == name)
            .and_then(|i| i.ipv4))
    }
}

#[derive(Debug, Default)]
pub struct SysinfoInterfaces;

impl SysinfoInterfaces {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InterfaceSource for SysinfoInterfaces {
    #[instrument(skip(self), fields(repo = "interfaces", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<NetworkInterface>> {
        tokio::task::spawn_blocking(|| {
            let networks = Networks::new_with_refreshed_list();
            let mut out: Vec<NetworkInterface> = networks
                .list()
                .iter()
                .map(|(name, data)| NetworkInterface {
                    name: name.clone(),
                    ipv4: data.ip_networks().iter().find_map(|n| match n.addr {
                        IpAddr::V4(v4) => Some(v4),
                        IpAddr::V6(_) => None,
                    }),
                })
                .collect();
            out.sort_by(|a, b| a.name.cmp(&b.name));
            out
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))
    }
}

/// A fixed interface table.
#[derive(Debug, Clone, Default)]
pub struct StaticInterfaces {
    interfaces: Vec<NetworkInterface>,
}

impl StaticInterfaces {
    pub fn new(mut interfaces: Vec<NetworkInterface>) -> Self {
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Self { interfaces }
    }
}

#[async_trait]
impl InterfaceSource for StaticInterfaces {
    async fn list(&self) -> anyhow::Result<Vec<NetworkInterface>> {
        Ok(self.interfaces.clone())
    }
}
