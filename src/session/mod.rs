//! Session orchestration
//!
//! - `controller`: the session record and its operations
//! - `scheduler`: the single repeating poll timer
//! - `guard`: one-shot deadlines for wake and boot
//! - `events`: what the session tells the presentation layer

mod controller;
mod events;
mod guard;
mod scheduler;

pub use controller::{SessionController, SessionTiming, SessionView};
pub use events::{EventSink, SessionEvent, Severity};
pub use guard::ActionTimeoutGuard;
pub use scheduler::Scheduler;
