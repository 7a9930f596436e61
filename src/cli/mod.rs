//! Command implementations
//!
//! Every command that talks to the backend goes through [`Connection`]:
//! load the config, apply command-line overrides, check the backend is up
//! and authenticate with the PIN.

pub mod init;
pub mod probe;
pub mod status;
pub mod unlock;
pub mod wake;
pub mod watch;

use crate::client::HttpBackend;
use crate::config::ClientConfig;
use crate::session::{SessionController, SessionEvent};
use crate::Result;
use colored::Colorize;
use dialoguer::Password;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;

/// Global options shared by all commands
#[derive(Debug, Clone, Default)]
pub struct Connection {
    pub config_path: Option<PathBuf>,
    pub server: Option<String>,
    pub pin: Option<String>,
}

/// Authenticated session plus its event stream
pub struct Session {
    pub config: ClientConfig,
    pub controller: SessionController<HttpBackend>,
    pub events: UnboundedReceiver<SessionEvent>,
}

impl Connection {
    /// Config file with the `--server` override applied
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::resolve(self.config_path.as_deref())?;
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn backend(&self, config: &ClientConfig) -> Result<HttpBackend> {
        HttpBackend::new(&config.server_url, config.request_timeout())
    }

    /// Probe, authenticate and do the first status poll
    pub async fn open(&self) -> Result<Session> {
        let config = self.config()?;
        let backend = self.backend(&config)?;

        if !crate::client::WakeBackend::probe(&backend).await {
            anyhow::bail!("Wake backend at {} is not responding", config.server_url);
        }

        let pin = match &self.pin {
            Some(pin) => pin.clone(),
            None => read_pin().await?,
        };

        let (controller, events) = SessionController::new(backend, config.timing());
        controller.authenticate(&pin).await?;
        tracing::debug!("Session open against {}", config.server_url);

        Ok(Session {
            config,
            controller,
            events,
        })
    }
}

async fn read_pin() -> Result<String> {
    let pin = tokio::task::spawn_blocking(|| Password::new().with_prompt("PIN").interact()).await??;
    Ok(pin)
}

/// Shared tail of the commands that end in watching the boot
pub(crate) async fn watch_until_done(session: &mut Session) -> Result<()> {
    let mut presenter = crate::ui::TerminalPresenter::new();
    let outcome = presenter.watch(&session.controller, &mut session.events).await?;

    match outcome {
        crate::ui::WatchOutcome::Ready | crate::ui::WatchOutcome::Closed => {}
        crate::ui::WatchOutcome::Interrupted => {
            println!("{}", "Stopped watching, the host keeps booting on its own".yellow());
        }
        crate::ui::WatchOutcome::LoggedOut => {
            anyhow::bail!("Session was rejected by the backend");
        }
    }

    session.controller.logout().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_server_flag_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "server_url = \"http://from-file:8080\"\n").unwrap();

        let connection = Connection {
            config_path: Some(path),
            server: Some("http://from-flag:9090".to_string()),
            pin: None,
        };
        assert_eq!(connection.config().unwrap().server_url, "http://from-flag:9090");
    }

    #[test]
    fn test_empty_server_flag_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let connection = Connection {
            config_path: Some(temp_dir.path().join("missing.toml")),
            server: Some("  ".to_string()),
            pin: None,
        };
        assert!(connection.config().is_err());
    }
}
