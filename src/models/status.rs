use serde::{Deserialize, Serialize};

/// One observation of the remote host, as reported by `GET /api/status`.
///
/// The three probe flags are independent. The backend pings the host and
/// probes both SSH ports separately, so any combination can show up
/// (e.g. reachable with neither SSH port open while the kernel is still
/// bringing up services).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Host answers at the network layer (ICMP)
    #[serde(default)]
    pub reachable: bool,

    /// Pre-boot (dropbear in initrd) SSH accepts connections
    #[serde(default)]
    pub initrd_ssh_open: bool,

    /// Fully booted system SSH accepts connections
    #[serde(default)]
    pub system_ssh_open: bool,

    /// Address the backend probes, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homelab_ip: Option<String>,

    /// Port the backend probes for initrd SSH, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initrd_ssh_port: Option<u16>,
}

impl StatusSnapshot {
    /// Build a snapshot from the three probe flags
    pub fn new(reachable: bool, initrd_ssh_open: bool, system_ssh_open: bool) -> Self {
        Self {
            reachable,
            initrd_ssh_open,
            system_ssh_open,
            homelab_ip: None,
            initrd_ssh_port: None,
        }
    }

    /// Nothing answers
    pub fn offline() -> Self {
        Self::new(false, false, false)
    }
}
