//! External wake backend interface
//!
//! The backend owns the real work (magic packets, SSH probing, passphrase
//! delivery). This module only describes the four calls the session needs
//! and ships one HTTP implementation:
//! - `POST /api/auth {pin}` -> `{token}`
//! - `GET /api/status` -> `{reachable, initrd_ssh_open, system_ssh_open}`
//! - `POST /api/wol` -> ack
//! - `POST /api/unlock {passphrase}` -> ack

pub mod error;
pub mod http;
pub mod validate;

pub use error::{ActionError, AuthError, PollError};
pub use http::HttpBackend;

use crate::models::{StatusSnapshot, Token};
use async_trait::async_trait;

#[async_trait]
pub trait WakeBackend: Send + Sync + 'static {
    /// Whether the backend itself is up (answers, but wants auth)
    async fn probe(&self) -> bool;

    async fn authenticate(&self, pin: &str) -> Result<Token, AuthError>;

    async fn status(&self, token: &Token) -> Result<StatusSnapshot, PollError>;

    /// Ask the backend to send a Wake-on-LAN packet
    async fn wake(&self, token: &Token) -> Result<(), ActionError>;

    /// Ask the backend to deliver the disk passphrase to initrd
    async fn unlock(&self, token: &Token, passphrase: &str) -> Result<(), ActionError>;
}
