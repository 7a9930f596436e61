use super::Connection;
use crate::client::WakeBackend;
use crate::Result;
use colored::Colorize;

/// Check the backend answers, without authenticating
pub async fn run(connection: &Connection) -> Result<()> {
    let config = connection.config()?;
    let backend = connection.backend(&config)?;
    tracing::debug!("Probing {}", backend.status_url());

    if backend.probe().await {
        println!("{}", format!("✓ Wake backend at {} is up", config.server_url).green());
        Ok(())
    } else {
        anyhow::bail!("Wake backend at {} is not responding", config.server_url)
    }
}
