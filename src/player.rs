use anyhow::{Context, Result, anyhow};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// External process that plays the overlay's embed URL while it is mounted.
pub struct ExternalPlayer {
  command: Option<String>,
  child: Option<Child>,
}

impl ExternalPlayer {
  pub fn new(command: Option<String>) -> Self {
    Self { command, child: None }
  }

  pub fn is_running(&self) -> bool {
    self.child.is_some()
  }

  pub fn program(&self) -> Option<&str> {
    self.command.as_deref().and_then(|c| c.split_whitespace().next())
  }

  /// Spawn the configured command with `url` appended. No-op when disabled.
  /// Must be called from within a tokio runtime.
  pub fn start(&mut self, url: &str) -> Result<()> {
    self.stop();
    let Some(command) = self.command.as_deref() else {
      return Ok(());
    };
    let mut parts = command.split_whitespace();
    let program = parts.next().context("Player command is empty")?;

    let child = Command::new(program)
      .args(parts)
      .arg(url)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      // Not drained; piping it would eventually block the player.
      .stderr(Stdio::null())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
          anyhow!("{} not found. Install it or set player_command in prefs.toml", program)
        } else {
          anyhow!(e).context(format!("Failed to spawn {}", program))
        }
      })?;

    info!(program, url, "player: started");
    self.child = Some(child);
    Ok(())
  }

  pub fn stop(&mut self) {
    if let Some(mut child) = self.child.take() {
      if let Err(e) = child.start_kill() {
        warn!(err = %e, "player: failed to kill process");
      }
      info!("player: stopped");
    }
  }
}

impl Drop for ExternalPlayer {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Follow a link in the user's browser.
pub fn open_in_browser(url: &str) -> Result<()> {
  #[cfg(target_os = "macos")]
  let cmd = "open";
  #[cfg(target_os = "windows")]
  let cmd = "explorer";
  #[cfg(not(any(target_os = "macos", target_os = "windows")))]
  let cmd = "xdg-open";

  let mut child = std::process::Command::new(cmd)
    .arg(url)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .with_context(|| format!("Failed to run {} for {}", cmd, url))?;
  // Reap in the background so the opener doesn't linger as a zombie.
  std::thread::spawn(move || {
    let _ = child.wait();
  });
  Ok(())
}
