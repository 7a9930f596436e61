use super::Connection;
use crate::models::{Phase, StatusSnapshot};
use crate::ui::terminal::{phase_icon, styled_phase};
use crate::Result;
use colored::Colorize;

fn yes_no(open: bool) -> colored::ColoredString {
    if open {
        "open".green()
    } else {
        "closed".bright_black()
    }
}

pub fn render_json(phase: Phase, snapshot: &StatusSnapshot) -> Result<String> {
    let value = serde_json::json!({
        "phase": phase,
        "description": phase.description(),
        "status": snapshot,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// One status poll, printed
pub async fn run(connection: &Connection, json: bool) -> Result<()> {
    let session = connection.open().await?;
    let snapshot = session.controller.refresh().await?;
    let phase = session.controller.phase().await;
    session.controller.logout().await;

    if json {
        println!("{}", render_json(phase, &snapshot)?);
        return Ok(());
    }

    println!("{}", format!("Status for: {}", session.config.server_url).cyan().bold());
    println!();
    println!("   Phase:      {} {}", phase_icon(phase), styled_phase(phase));
    println!("               {}", phase.description());
    println!("   Reachable:  {}", if snapshot.reachable { "yes".green() } else { "no".red() });
    println!("   Initrd SSH: {}", yes_no(snapshot.initrd_ssh_open));
    println!("   System SSH: {}", yes_no(snapshot.system_ssh_open));

    if let Some(ip) = &snapshot.homelab_ip {
        match snapshot.initrd_ssh_port {
            Some(port) => println!("   Host:       {} (initrd port {})", ip, port),
            None => println!("   Host:       {}", ip),
        }
    }

    println!("   Checked:    {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let snapshot = StatusSnapshot::new(true, true, false);
        let rendered = render_json(Phase::Initrd, &snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["phase"], "initrd");
        assert_eq!(value["status"]["initrd_ssh_open"], true);
        assert_eq!(value["status"]["system_ssh_open"], false);
        assert!(value["status"].get("homelab_ip").is_none());
    }
}
