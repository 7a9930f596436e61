use super::{watch_until_done, Connection};
use crate::models::Phase;
use crate::Result;
use colored::Colorize;

/// Follow the host without sending anything; prompts when initrd is up
pub async fn run(connection: &Connection) -> Result<()> {
    let mut session = connection.open().await?;

    if session.controller.phase().await == Phase::Offline {
        println!("{}", "💤 Host is offline, run 'wakectl wake' to start it".bright_black());
    }

    watch_until_done(&mut session).await
}
