pub mod phase;
pub mod status;
pub mod token;

pub use phase::Phase;
pub use status::StatusSnapshot;
pub use token::Token;
