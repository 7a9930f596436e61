//! Pure phase logic
//!
//! No I/O and no timers live here; see `session` for the orchestration
//! that feeds snapshots into the resolver.

mod resolver;

pub use resolver::resolve;
