use serde::{Deserialize, Serialize};
use std::fmt;

/// Inferred boot progress of the remote host
///
/// Ordered by progress, but transitions are not linear: a stuck wake falls
/// back to `Offline` and a reboot out of initrd can briefly read as offline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Offline,
    Waking,
    Initrd,
    Unlocking,
    Booting,
    Ready,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Offline,
        Phase::Waking,
        Phase::Initrd,
        Phase::Unlocking,
        Phase::Booting,
        Phase::Ready,
    ];

    /// Operator-facing line for this phase
    pub fn description(self) -> &'static str {
        match self {
            Phase::Offline => "Server is offline",
            Phase::Waking => "Sending wake signal...",
            Phase::Initrd => "Initrd SSH ready - enter passphrase",
            Phase::Unlocking | Phase::Booting => "Passphrase sent, booting...",
            Phase::Ready => "System is ready!",
        }
    }

    /// Nothing left to wait for
    pub fn is_terminal(self) -> bool {
        self == Phase::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Offline => "offline",
            Phase::Waking => "waking",
            Phase::Initrd => "initrd",
            Phase::Unlocking => "unlocking",
            Phase::Booting => "booting",
            Phase::Ready => "ready",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
