//! Terminal presentation of a session
//!
//! Renders phase changes on a spinner line, prints messages in color and
//! asks for the disk passphrase when the session requests it.

use crate::client::{ActionError, WakeBackend};
use crate::models::Phase;
use crate::session::{SessionController, SessionEvent, Severity};
use crate::Result;
use colored::{ColoredString, Colorize};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Why `watch` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Ready,
    LoggedOut,
    Interrupted,
    /// Event stream ended (session dropped)
    Closed,
}

pub fn phase_icon(phase: Phase) -> &'static str {
    match phase {
        Phase::Offline => "💤",
        Phase::Waking => "⏰",
        Phase::Initrd => "🔒",
        Phase::Unlocking | Phase::Booting => "🔓",
        Phase::Ready => "✅",
    }
}

pub fn styled_phase(phase: Phase) -> ColoredString {
    let label = phase.as_str();
    match phase {
        Phase::Offline => label.bright_black(),
        Phase::Waking => label.yellow(),
        Phase::Initrd => label.magenta(),
        Phase::Unlocking | Phase::Booting => label.blue(),
        Phase::Ready => label.green(),
    }
}

pub fn styled_message(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => format!("ℹ {}", text).cyan(),
        Severity::Success => format!("✓ {}", text).green(),
        Severity::Error => format!("✗ {}", text).red(),
    }
}

/// Spinner-based presenter for one watch run
pub struct TerminalPresenter {
    spinner: Option<ProgressBar>,
    phase: Phase,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            spinner: None,
            phase: Phase::Offline,
        }
    }

    fn spinner(&mut self) -> &ProgressBar {
        self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        })
    }

    /// Clear the spinner line so something else can use the terminal
    fn pause(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn show_phase(&mut self, phase: Phase) {
        self.phase = phase;
        let line = format!(
            "{} {} {}",
            phase_icon(phase),
            styled_phase(phase),
            phase.description()
        );
        self.spinner().set_message(line);
    }

    pub fn show_message(&mut self, text: &str, severity: Severity) {
        let line = styled_message(text, severity);
        match &self.spinner {
            Some(pb) => pb.println(line.to_string()),
            None => println!("{}", line),
        }
    }

    /// Render session events until the host is ready, the session ends or
    /// the operator hits Ctrl-C.
    pub async fn watch<B: WakeBackend>(
        &mut self,
        session: &SessionController<B>,
        events: &mut UnboundedReceiver<SessionEvent>,
    ) -> Result<WatchOutcome> {
        let current = session.phase().await;
        if current.is_terminal() {
            self.show_message(current.description(), Severity::Success);
            return Ok(WatchOutcome::Ready);
        }
        self.show_phase(current);

        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                _ = tokio::signal::ctrl_c() => {
                    self.pause();
                    return Ok(WatchOutcome::Interrupted);
                }
            };

            let Some(event) = event else {
                self.pause();
                return Ok(WatchOutcome::Closed);
            };

            match event {
                SessionEvent::PhaseEntered { phase, .. } => {
                    if phase.is_terminal() {
                        self.pause();
                        println!("{} {}", phase_icon(phase), phase.description().green().bold());
                        return Ok(WatchOutcome::Ready);
                    }
                    self.show_phase(phase);
                }
                SessionEvent::UnlockPrompt => {
                    // Already answered (e.g. `wakectl unlock`) or moved on
                    if session.phase().await != Phase::Initrd {
                        continue;
                    }
                    self.pause();
                    prompt_unlock(session).await?;
                    self.show_phase(session.phase().await);
                }
                SessionEvent::Message { text, severity } => {
                    self.show_message(&text, severity);
                }
                SessionEvent::LoggedOut => {
                    self.pause();
                    println!("{}", "⚠ Session expired, please authenticate again".yellow());
                    return Ok(WatchOutcome::LoggedOut);
                }
            }
        }
    }
}

/// Ask for the disk passphrase on the terminal. Empty input skips.
pub async fn read_passphrase() -> Result<Option<String>> {
    let input = tokio::task::spawn_blocking(|| {
        Password::new()
            .with_prompt("Disk passphrase (empty to skip)")
            .allow_empty_password(true)
            .interact()
    })
    .await??;

    Ok(if input.is_empty() { None } else { Some(input) })
}

/// Prompt until the passphrase is accepted, skipped, or the session is gone
pub async fn prompt_unlock<B: WakeBackend>(session: &SessionController<B>) -> Result<bool> {
    println!("{}", "🔒 Initrd SSH is up, the disk is waiting for its passphrase".magenta());

    loop {
        let Some(passphrase) = read_passphrase().await? else {
            println!("{}", "Unlock skipped, run 'wakectl unlock' when ready".yellow());
            return Ok(false);
        };

        match session.submit_unlock(&passphrase).await {
            Ok(()) => {
                println!("{}", styled_message("Passphrase sent", Severity::Success));
                return Ok(true);
            }
            Err(ActionError::Unauthorized) => return Err(ActionError::Unauthorized.into()),
            Err(e) => println!("{}", styled_message(&e.to_string(), Severity::Error)),
        }
    }
}
