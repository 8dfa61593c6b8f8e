use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Command;

// Asks `which` (or `where` on Windows) for the player; Windows prefers the `.exe` hit.
fn locate_program(program: &str) -> Option<PathBuf> {
    let locator = if cfg!(target_os = "windows") { "where" } else { "which" };
    let output = Command::new(locator).arg(program).output().ok()?;
    if !output.status.success() {
        tracing::debug!(%program, "Player is not on PATH");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let hits: Vec<&str> = stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let chosen = hits
        .iter()
        .find(|hit| cfg!(target_os = "windows") && hit.ends_with(".exe"))
        .or_else(|| hits.first())?;

    tracing::debug!(%program, path = %chosen, "Located player");
    Some(PathBuf::from(*chosen))
}

/// Program and leading arguments used to open a stream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPlayer {
    pub program: String,
    pub args: Vec<String>,
}

impl MediaPlayer {
    pub fn resolve(preferred: Option<&str>) -> Self {
        if let Some(player) = preferred {
            if let Some(path) = locate_program(player) {
                return Self {
                    program: path.to_string_lossy().into_owned(),
                    args: Vec::new(),
                };
            }
            tracing::warn!(%player, "Configured video_player not found; using the system opener");
        }

        Self::system_default()
    }

    fn system_default() -> Self {
        #[cfg(target_os = "windows")]
        let (program, args) = ("cmd", vec!["/C".to_string(), "start".to_string()]);

        #[cfg(target_os = "macos")]
        let (program, args) = ("open", Vec::new());

        #[cfg(all(unix, not(target_os = "macos")))]
        let (program, args) = ("xdg-open", Vec::new());

        Self {
            program: program.to_string(),
            args,
        }
    }

    pub fn play(&self, url: &str) -> Result<()> {
        tracing::info!(program = %self.program, "Launching player");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.program))?
            .wait()?;

        if !status.success() {
            anyhow::bail!("Media player exited with status: {}", status);
        }
        Ok(())
    }
}

pub fn stream_url(stream: &Value) -> Result<&str> {
    stream
        .get("url")
        .and_then(Value::as_str)
        .context("Stream has no playable URL")
}

/// Prints the stream URL or hands it to the configured player.
pub fn handle_stream(stream: &Value, url_only: bool, video_player: Option<&str>) -> Result<()> {
    let url = stream_url(stream)?;
    if let Some(license) = stream.pointer("/drm/licenseUrl").and_then(Value::as_str) {
        tracing::debug!(%license, "Stream is DRM protected");
    }

    if url_only {
        println!("{url}");
        return Ok(());
    }

    MediaPlayer::resolve(video_player).play(url)
}
