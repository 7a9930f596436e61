use super::{watch_until_done, Connection};
use crate::Result;
use colored::Colorize;

/// Send Wake-on-LAN and follow the boot until the system is up
pub async fn run(connection: &Connection) -> Result<()> {
    let mut session = connection.open().await?;

    let phase = session.controller.phase().await;
    if phase.is_terminal() {
        println!("{}", format!("✓ {}", phase.description()).green());
        session.controller.logout().await;
        return Ok(());
    }

    session.controller.request_wake().await?;
    println!("{}", "⏰ Wake-on-LAN packet sent".cyan());

    watch_until_done(&mut session).await
}
