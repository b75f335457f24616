// Wake flow: check permission, look up the device, resolve its interface, send.
// Nothing is persisted, so a crash mid-send leaves no state behind.

use super::{MagicPacketSender, WolError, magic_packet, parse_mac};
use crate::config::UnresolvedInterfacePolicy;
use crate::device_repo::DeviceRepo;
use crate::interfaces::InterfaceSource;
use crate::models::{Device, User};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub enum WakeOutcome {
    Sent {
        device: Device,
        source: Option<Ipv4Addr>,
    },
    /// Caller lacks `can_send_wol`.
    Denied,
    DeviceNotFound(i64),
    /// The device's interface has no IPv4 address and the policy is `skip`.
    InterfaceUnresolved {
        device: Device,
    },
    Failed {
        device: Device,
        error: WolError,
    },
}

impl WakeOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, WakeOutcome::Sent { .. })
    }

    /// User-facing notice for the device list.
    pub fn notice(&self) -> String {
        match self {
            WakeOutcome::Sent {
                device,
                source: Some(ip),
            } => format!(
                "Magic packet sent to {} ({}) via {} ({})",
                device.name, device.mac, device.interface, ip
            ),
            WakeOutcome::Sent {
                device,
                source: None,
            } => format!(
                "Magic packet sent to {} ({}) without a source address",
                device.name, device.mac
            ),
            WakeOutcome::Denied => "You are not allowed to send wake packets".into(),
            WakeOutcome::DeviceNotFound(id) => format!("Device {} not found", id),
            WakeOutcome::InterfaceUnresolved { device } => format!(
                "Interface {} has no IPv4 address; nothing sent to {}",
                device.interface, device.name
            ),
            WakeOutcome::Failed { device, error } => {
                format!("Waking {} failed: {}", device.name, error)
            }
        }
    }
}

pub struct WakeService {
    devices: Arc<DeviceRepo>,
    interfaces: Arc<dyn InterfaceSource>,
    sender: Arc<dyn MagicPacketSender>,
    policy: UnresolvedInterfacePolicy,
}

impl WakeService {
    pub fn new(
        devices: Arc<DeviceRepo>,
        interfaces: Arc<dyn InterfaceSource>,
        sender: Arc<dyn MagicPacketSender>,
        policy: UnresolvedInterfacePolicy,
    ) -> Self {
        Self {
            devices,
            interfaces,
            sender,
            policy,
        }
    }

    /// Errors only on storage failure; every other failure is an outcome.
    #[instrument(skip(self, user), fields(user = %user.username))]
    pub async fn wake(&self, user: &User, device_id: i64) -> anyhow::Result<WakeOutcome> {
        if !user.capabilities.can_send_wol {
            warn!("wake denied: missing can_send_wol");
            return Ok(WakeOutcome::Denied);
        }
        let Some(device) = self.devices.get(device_id).await? else {
            info!("wake requested for unknown device");
            return Ok(WakeOutcome::DeviceNotFound(device_id));
        };

        let mac = match parse_mac(&device.mac) {
            Ok(mac) => mac,
            Err(error) => {
                warn!(mac = %device.mac, "stored MAC does not parse");
                return Ok(WakeOutcome::Failed { device, error });
            }
        };

        let source = match self.interfaces.resolve_ipv4(&device.interface).await {
            Ok(ip) => ip,
            Err(e) => {
                warn!(error = %e, "interface lookup failed");
                return Ok(WakeOutcome::Failed {
                    device,
                    error: WolError::InterfaceLookup(e.to_string()),
                });
            }
        };
        if source.is_none() && self.policy == UnresolvedInterfacePolicy::Skip {
            warn!(interface = %device.interface, "interface has no IPv4 address; skipping send");
            return Ok(WakeOutcome::InterfaceUnresolved { device });
        }

        let packet = magic_packet(mac);
        match self.sender.send(&packet, source).await {
            Ok(()) => {
                info!(
                    device = %device.name,
                    mac = %device.mac,
                    interface = %device.interface,
                    source = ?source,
                    "magic packet sent"
                );
                Ok(WakeOutcome::Sent { device, source })
            }
            Err(error) => {
                warn!(device = %device.name, error = %error, "magic packet send failed");
                Ok(WakeOutcome::Failed { device, error })
            }
        }
    }
}
