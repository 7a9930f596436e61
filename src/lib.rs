// wakectl - remote wake, initrd unlock and boot tracking for a home server
// Infers the boot phase from status polls and drives the operator through it

pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod session;
pub mod state;
pub mod ui;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use client::{ActionError, AuthError, HttpBackend, PollError, WakeBackend};
pub use models::{Phase, StatusSnapshot, Token};
pub use session::{SessionController, SessionEvent, SessionTiming};
