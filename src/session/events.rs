//! Events the session emits for a presentation layer
//!
//! The session never renders anything itself. Whoever holds the receiver
//! decides how a phase change, a prompt or a message looks.

use crate::models::Phase;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How a message should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// `phase` was entered, coming from `previous`
    PhaseEntered { phase: Phase, previous: Phase },

    /// Initrd is waiting for the disk passphrase
    UnlockPrompt,

    /// Operator-visible message (ready notification, timeouts)
    Message { text: String, severity: Severity },

    /// Token dropped; the operator has to authenticate again
    LoggedOut,
}

/// Sending half of the event channel
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine, e.g. a one-shot status query
        let _ = self.tx.send(event);
    }

    pub fn message(&self, text: impl Into<String>, severity: Severity) {
        self.emit(SessionEvent::Message {
            text: text.into(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(SessionEvent::UnlockPrompt);
    }

    #[test]
    fn test_message_roundtrip() {
        let (sink, mut rx) = EventSink::channel();
        sink.message("hello", Severity::Success);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Message {
                text: "hello".to_string(),
                severity: Severity::Success,
            }
        );
    }
}
