//! SessionController - owns the session and reacts to poll results
//!
//! Every operation locks the session only for short, await-free critical
//! sections. Network calls happen outside the lock, which is where other
//! work (a poll tick, an operator action) may interleave. Phase-entry edges
//! gate the one-time side effects: the unlock prompt on entering `Initrd`
//! and the ready notification (plus stopping polling) on entering `Ready`.

use super::events::{EventSink, SessionEvent, Severity};
use super::guard::ActionTimeoutGuard;
use super::scheduler::Scheduler;
use crate::client::validate::{validate_passphrase, validate_pin};
use crate::client::{ActionError, AuthError, PollError, WakeBackend};
use crate::models::{Phase, StatusSnapshot, Token};
use crate::state::resolve;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

/// Cadences and deadlines the session runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Background polling while nothing is expected to happen
    pub slow_poll: Duration,
    /// Polling right after a wake or unlock
    pub fast_poll: Duration,
    /// How long the host gets to show up after a wake
    pub wake_timeout: Duration,
    /// How long the system gets to boot after an unlock
    pub boot_timeout: Duration,
    /// Delay between entering initrd and prompting
    pub prompt_debounce: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            slow_poll: Duration::from_secs(10),
            fast_poll: Duration::from_secs(2),
            wake_timeout: Duration::from_secs(120),
            boot_timeout: Duration::from_secs(180),
            prompt_debounce: Duration::from_millis(500),
        }
    }
}

/// Mutable session record, only touched under the controller's lock
#[derive(Debug, Default)]
struct SessionState {
    token: Option<Token>,
    phase: Phase,
    /// Bumped on authenticate/logout; late results from an older epoch are dropped
    epoch: u64,
    prompt_pending: bool,
    poller: Scheduler,
    wake_guard: ActionTimeoutGuard,
    boot_guard: ActionTimeoutGuard,
}

/// Read-only copy of the session for callers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    pub authenticated: bool,
    pub phase: Phase,
    pub poll_interval: Option<Duration>,
    pub prompt_pending: bool,
}

struct Inner<B> {
    backend: B,
    timing: SessionTiming,
    events: EventSink,
    state: Arc<Mutex<SessionState>>,
}

/// Cheap-to-clone handle on one session
pub struct SessionController<B: WakeBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: WakeBackend> Clone for SessionController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: WakeBackend> SessionController<B> {
    /// New unauthenticated session in `Offline`, plus the event stream for the UI
    pub fn new(backend: B, timing: SessionTiming) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = EventSink::channel();
        let inner = Arc::new(Inner {
            backend,
            timing,
            events,
            state: Arc::new(Mutex::new(SessionState::default())),
        });
        (Self { inner }, rx)
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn timing(&self) -> SessionTiming {
        self.inner.timing
    }

    pub async fn phase(&self) -> Phase {
        self.inner.state.lock().await.phase
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.lock().await.token.is_some()
    }

    pub async fn view(&self) -> SessionView {
        let state = self.inner.state.lock().await;
        SessionView {
            authenticated: state.token.is_some(),
            phase: state.phase,
            poll_interval: state.poller.interval(),
            prompt_pending: state.prompt_pending,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Exchange a PIN for a token, poll once, then keep polling slowly.
    ///
    /// Anything left from an earlier token (timers, deadlines, a pending
    /// prompt) is dropped. A failing first poll is not fatal unless the
    /// token was rejected.
    pub async fn authenticate(&self, pin: &str) -> Result<Token, AuthError> {
        validate_pin(pin)?;
        let token = self.inner.backend.authenticate(pin).await?;

        let epoch = {
            let mut state = self.inner.state.lock().await;
            // New token, new session: the first poll works the phase out again
            state.poller.stop();
            state.wake_guard.disarm();
            state.boot_guard.disarm();
            state.prompt_pending = false;
            state.token = Some(token.clone());
            state.epoch += 1;
            self.inner.set_phase(&mut state, Phase::Offline);
            state.epoch
        };
        tracing::info!("Authenticated against wake backend");

        match self.refresh().await {
            Ok(_) => {}
            Err(e) if e.is_unauthorized() => return Err(AuthError::Unauthorized),
            Err(e) => tracing::warn!("Initial status poll failed: {}", e),
        }

        let mut state = self.inner.state.lock().await;
        if state.epoch == epoch && !state.phase.is_terminal() {
            self.inner.start_polling(&mut state, self.inner.timing.slow_poll);
        }

        Ok(token)
    }

    /// Poll the backend once and apply the result.
    pub async fn refresh(&self) -> Result<StatusSnapshot, PollError> {
        let current = {
            let state = self.inner.state.lock().await;
            state.token.clone().map(|token| (token, state.epoch))
        };
        let Some((token, epoch)) = current else {
            self.logout().await;
            return Err(PollError::Unauthorized);
        };

        match self.inner.backend.status(&token).await {
            Ok(snapshot) => {
                let mut state = self.inner.state.lock().await;
                if state.epoch == epoch {
                    self.inner.apply_snapshot(&mut state, &snapshot);
                } else {
                    tracing::debug!("Dropping status from a previous session");
                }
                Ok(snapshot)
            }
            Err(PollError::Unauthorized) => {
                tracing::warn!("Status poll rejected, logging out");
                self.logout_if_current(epoch).await;
                Err(PollError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    /// Ask the backend to wake the host and watch for it to come up.
    ///
    /// The phase flips to `Waking` before the call and is put back if the
    /// call fails. If the host has not left `Waking` by the wake deadline,
    /// the session reports it, falls back to `Offline` and slows down.
    pub async fn request_wake(&self) -> Result<(), ActionError> {
        let (token, previous, epoch) = self.begin_action(Phase::Waking).await?;

        if let Err(e) = self.inner.backend.wake(&token).await {
            self.fail_action(&e, Phase::Waking, previous, epoch).await;
            return Err(e);
        }

        let mut state = self.inner.state.lock().await;
        // A poll may have seen the system come up while we waited
        if state.epoch != epoch || state.phase.is_terminal() {
            return Ok(());
        }

        let timing = self.inner.timing;
        self.inner.start_polling(&mut state, timing.fast_poll);

        let weak = Arc::downgrade(&self.inner);
        state.wake_guard.arm(
            timing.wake_timeout,
            Arc::downgrade(&self.inner.state),
            |s: &SessionState| s.phase == Phase::Waking,
            move |s: &mut SessionState| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                tracing::warn!("Host did not come up within {:?}", timing.wake_timeout);
                inner.events.message(
                    format!("Server did not respond within {}", human_duration(timing.wake_timeout)),
                    Severity::Error,
                );
                inner.set_phase(s, Phase::Offline);
                inner.start_polling(s, timing.slow_poll);
            },
        );

        Ok(())
    }

    /// Deliver the disk passphrase and watch the system boot.
    ///
    /// `Unlocking` while the call is in flight, `Booting` once acknowledged.
    /// Missing the boot deadline only slows polling down; the host may
    /// genuinely still be booting, so the phase is left alone.
    pub async fn submit_unlock(&self, passphrase: &str) -> Result<(), ActionError> {
        validate_passphrase(passphrase)?;
        let (token, previous, epoch) = self.begin_action(Phase::Unlocking).await?;

        if let Err(e) = self.inner.backend.unlock(&token, passphrase).await {
            self.fail_action(&e, Phase::Unlocking, previous, epoch).await;
            return Err(e);
        }

        let mut state = self.inner.state.lock().await;
        // Ready already stopped polling; don't restart it
        if state.epoch != epoch || state.phase.is_terminal() {
            return Ok(());
        }

        self.inner.set_phase(&mut state, Phase::Booting);

        let timing = self.inner.timing;
        self.inner.start_polling(&mut state, timing.fast_poll);

        let weak = Arc::downgrade(&self.inner);
        state.boot_guard.arm(
            timing.boot_timeout,
            Arc::downgrade(&self.inner.state),
            |s: &SessionState| matches!(s.phase, Phase::Booting | Phase::Unlocking),
            move |s: &mut SessionState| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                tracing::warn!("System did not boot within {:?}", timing.boot_timeout);
                inner.events.message(
                    format!("System did not fully boot within {}", human_duration(timing.boot_timeout)),
                    Severity::Error,
                );
                inner.start_polling(s, timing.slow_poll);
            },
        );

        Ok(())
    }

    /// Drop the token, stop all timers and go back to `Offline`.
    pub async fn logout(&self) {
        let mut state = self.inner.state.lock().await;
        self.inner.reset(&mut state);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Take the token and apply the optimistic phase for an action
    async fn begin_action(&self, optimistic: Phase) -> Result<(Token, Phase, u64), ActionError> {
        let mut state = self.inner.state.lock().await;
        let Some(token) = state.token.clone() else {
            self.inner.reset(&mut state);
            return Err(ActionError::Unauthorized);
        };

        let previous = state.phase;
        self.inner.set_phase(&mut state, optimistic);
        Ok((token, previous, state.epoch))
    }

    /// Undo an optimistic phase after a failed action call
    async fn fail_action(&self, err: &ActionError, optimistic: Phase, previous: Phase, epoch: u64) {
        if err.is_unauthorized() {
            self.logout_if_current(epoch).await;
            return;
        }

        tracing::warn!("Action failed: {}", err);
        let mut state = self.inner.state.lock().await;
        // A poll may already have moved us on; only undo our own change
        if state.epoch == epoch && state.phase == optimistic {
            self.inner.set_phase(&mut state, previous);
        }
    }

    async fn logout_if_current(&self, epoch: u64) {
        let mut state = self.inner.state.lock().await;
        if state.epoch == epoch {
            self.inner.reset(&mut state);
        }
    }
}

impl<B: WakeBackend> Inner<B> {
    fn set_phase(&self, state: &mut SessionState, phase: Phase) {
        let previous = state.phase;
        if previous == phase {
            return;
        }

        tracing::debug!("Phase {} -> {}", previous, phase);
        state.phase = phase;
        self.events.emit(SessionEvent::PhaseEntered { phase, previous });
    }

    fn apply_snapshot(self: &Arc<Self>, state: &mut SessionState, snapshot: &StatusSnapshot) {
        let previous = state.phase;
        let phase = resolve(snapshot, previous);

        // Message goes out before the phase event so a listener that stops
        // at Ready still sees it
        if phase == Phase::Ready && previous != Phase::Ready {
            self.events.message("System is fully booted and ready!", Severity::Success);
            state.poller.stop();
        }

        if phase == Phase::Initrd && previous != Phase::Initrd && !state.prompt_pending {
            state.prompt_pending = true;
            self.schedule_prompt(state.epoch);
        }

        self.set_phase(state, phase);
    }

    /// Show the unlock prompt after the debounce delay
    fn schedule_prompt(self: &Arc<Self>, epoch: u64) {
        let weak = Arc::downgrade(self);
        let delay = self.timing.prompt_debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.state.lock().await;
            if state.epoch != epoch {
                return;
            }
            state.prompt_pending = false;
            // Unlocked (or lost the host) during the debounce
            if state.phase == Phase::Initrd {
                inner.events.emit(SessionEvent::UnlockPrompt);
            }
        });
    }

    /// (Re)start background polling at `interval`
    fn start_polling(self: &Arc<Self>, state: &mut SessionState, interval: Duration) {
        let weak: Weak<Self> = Arc::downgrade(self);
        tracing::debug!("Polling every {:?}", interval);

        state.poller.start(interval, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return Ok(());
                };
                let session = SessionController { inner };
                let result = session.refresh().await;
                result.map(|_| ())
            }
        });
    }

    fn reset(&self, state: &mut SessionState) {
        let had_token = state.token.take().is_some();
        state.poller.stop();
        state.wake_guard.disarm();
        state.boot_guard.disarm();
        state.prompt_pending = false;
        state.epoch += 1;
        self.set_phase(state, Phase::Offline);

        if had_token {
            tracing::info!("Logged out");
            self.events.emit(SessionEvent::LoggedOut);
        }
    }
}

/// "2 minutes", "90 seconds"
fn human_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}
