pub mod terminal;

pub use terminal::{prompt_unlock, read_passphrase, TerminalPresenter, WatchOutcome};
