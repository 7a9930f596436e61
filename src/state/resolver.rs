//! Phase inference from a single status snapshot
//!
//! Polls are independent observations with no ordering guarantee beyond
//! arrival time, so the phase is recomputed from scratch on every snapshot.
//! The only memory is the previous phase, used to hold `Waking` while the
//! host is still coming up and to keep a lingering initrd reading after a
//! passphrase was submitted from looking like a fresh unlock prompt.

use crate::models::{Phase, StatusSnapshot};

/// Map a snapshot plus the previous phase onto the current phase.
///
/// First match wins:
/// 1. system SSH open -> `Ready`
/// 2. initrd SSH open -> `Booting` after `Unlocking`/`Booting`, else `Initrd`
/// 3. anything else -> `Waking` if we were waking, else `Offline`
pub fn resolve(snapshot: &StatusSnapshot, previous: Phase) -> Phase {
    if snapshot.system_ssh_open {
        return Phase::Ready;
    }

    if snapshot.initrd_ssh_open {
        return match previous {
            Phase::Unlocking | Phase::Booting => Phase::Booting,
            _ => Phase::Initrd,
        };
    }

    // Reachable without any SSH port is not a phase of its own. Both the
    // reachable and unreachable cases hold `Waking` and otherwise fall back
    // to `Offline`.
    match previous {
        Phase::Waking => Phase::Waking,
        _ => Phase::Offline,
    }
}
