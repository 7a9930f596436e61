use super::Connection;
use crate::config::ClientConfig;
use crate::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Where `init` writes: `--config` if given, else the default location
fn target_path(connection: &Connection) -> Result<PathBuf> {
    match &connection.config_path {
        Some(path) => Ok(path.clone()),
        None => ClientConfig::default_path()
            .ok_or_else(|| anyhow::anyhow!("No config directory on this system, pass --config")),
    }
}

/// Write a config file with defaults (plus `--server` if given)
pub fn run(connection: &Connection, force: bool) -> Result<PathBuf> {
    let path = target_path(connection)?;

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let mut config = ClientConfig::default();
    if let Some(server) = &connection.server {
        config.server_url = server.clone();
    }
    config.validate()?;
    config.save(&path)?;

    println!("{}", format!("✓ Wrote {}", path.display()).green());
    Ok(path)
}
