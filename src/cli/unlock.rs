use super::{watch_until_done, Connection};
use crate::models::Phase;
use crate::ui::prompt_unlock;
use crate::Result;
use colored::Colorize;

/// Send the disk passphrase right away instead of waiting for the prompt
pub async fn run(connection: &Connection) -> Result<()> {
    let mut session = connection.open().await?;

    let phase = session.controller.phase().await;
    if phase.is_terminal() {
        println!("{}", format!("✓ {}", phase.description()).green());
        session.controller.logout().await;
        return Ok(());
    }
    if phase != Phase::Initrd {
        println!(
            "{}",
            format!("⚠ Host is not waiting for a passphrase yet ({})", phase.description()).yellow()
        );
    }

    if !prompt_unlock(&session.controller).await? {
        session.controller.logout().await;
        return Ok(());
    }

    watch_until_done(&mut session).await
}
