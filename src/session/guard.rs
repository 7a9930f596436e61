//! One-shot deadline for an action that should finish quickly

use std::sync::Weak;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Deadline for one kind of action (wake, boot).
///
/// At fire time the predicate is checked against the live state, so a guard
/// whose action already progressed simply does nothing. Re-arming replaces
/// the pending deadline of the same kind.
#[derive(Debug, Default)]
pub struct ActionTimeoutGuard {
    task: Option<JoinHandle<()>>,
}

impl ActionTimeoutGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// After `deadline`, lock `state` and run `on_expire` if `predicate` still holds.
    ///
    /// Predicate and expiry run under the same lock, so nothing can slip in
    /// between the check and the reaction. If the state is gone by then, the
    /// guard quietly ends.
    pub fn arm<S, P, X>(&mut self, deadline: Duration, state: Weak<Mutex<S>>, predicate: P, on_expire: X)
    where
        S: Send + 'static,
        P: FnOnce(&S) -> bool + Send + 'static,
        X: FnOnce(&mut S) + Send + 'static,
    {
        self.disarm();

        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(deadline).await;

            let Some(state) = state.upgrade() else {
                return;
            };
            let mut state = state.lock().await;
            if predicate(&state) {
                on_expire(&mut state);
            }
        }));
    }

    /// Drop the pending deadline, if any
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Armed and not yet fired
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ActionTimeoutGuard {
    fn drop(&mut self) {
        self.disarm();
    }
}
