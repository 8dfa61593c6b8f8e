use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::{TokenData, UserData};

const CONFIG_TEMPLATE: &str = include_str!("config/template.toml");

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub device: Device,
    pub stream: Stream,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Device {
    pub boot_uuid: String,
    pub device_uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct Stream {
    pub video_player: Option<String>,
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "teliaplay-rs").context("Could not resolve project directory.")
}

fn config_file() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn tokens_file() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("tokens.json"))
}

/// Fills the template with credentials and a fresh device identity, keeping its comments.
pub fn render_template(template: &str, username: &str, password: &str) -> Result<String> {
    let mut doc: toml_edit::DocumentMut = template.parse()?;
    doc["credentials"]["username"] = toml_edit::value(username);
    doc["credentials"]["password"] = toml_edit::value(password);
    doc["device"]["boot_uuid"] = toml_edit::value(Uuid::new_v4().to_string());
    doc["device"]["device_uuid"] = toml_edit::value(Uuid::new_v4().to_string());

    Ok(doc.to_string())
}

impl AppConfig {
    fn prompt_credential(label: &str) -> io::Result<String> {
        if label.eq_ignore_ascii_case("password") {
            let pwd = rpassword::prompt_password("Enter Telia Play password: ")
                .map_err(|e| io::Error::other(e.to_string()))?;
            Ok(pwd.trim().to_string())
        } else {
            print!("Enter Telia Play {}: ", label);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            Ok(input.trim().to_string())
        }
    }

    pub fn generate_config() -> Result<()> {
        let config_file = config_file()?;
        if let Some(config_dir) = config_file.parent() {
            fs::create_dir_all(config_dir)?;
        }

        // Interactive terminal required for credential input
        if !io::stdin().is_terminal() {
            anyhow::bail!(
                "Cannot run --init in non-interactive mode.\n\
                 Please run this command in an interactive terminal, or manually create:\n\
                 {:#?}",
                config_file
            );
        }

        let username = Self::prompt_credential("username")?;
        let password = Self::prompt_credential("password")?;
        let contents = render_template(CONFIG_TEMPLATE, &username, &password)?;

        fs::write(&config_file, contents)
            .with_context(|| format!("Failed to write {}", config_file.display()))?;
        println!("Wrote config to {}", config_file.display());

        // A new device identity invalidates any stored tokens.
        clear_tokens()?;

        Ok(())
    }

    pub fn load() -> Result<Self> {
        let config_file = config_file()?;

        if !config_file.exists() {
            println!(
                "Config file not found, creating from template at {}",
                config_file.display()
            );
            Self::generate_config()?;
        }

        tracing::debug!("Loading config from: {}", config_file.display());

        let contents = fs::read_to_string(&config_file)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let parsed: AppConfig = toml::from_str(contents).context("Invalid config file")?;
        if parsed.device.boot_uuid.is_empty() || parsed.device.device_uuid.is_empty() {
            anyhow::bail!("Device identity missing from config; run --init to regenerate it");
        }

        Ok(parsed)
    }

    /// Identity for a new client, with whatever tokens were stored last time.
    pub fn user_data(&self) -> Result<UserData> {
        Ok(UserData {
            boot_uuid: self.device.boot_uuid.clone(),
            device_uuid: self.device.device_uuid.clone(),
            token_data: load_tokens()?,
        })
    }
}

pub fn load_tokens() -> Result<TokenData> {
    let path = tokens_file()?;
    if !path.exists() {
        return Ok(TokenData::default());
    }

    let contents = fs::read_to_string(&path)?;
    match serde_json::from_str(&contents) {
        Ok(tokens) => Ok(tokens),
        Err(e) => {
            tracing::warn!("Ignoring unreadable token file {}: {e}", path.display());
            Ok(TokenData::default())
        }
    }
}

pub fn save_tokens(tokens: &TokenData) -> Result<()> {
    let path = tokens_file()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    fs::write(&path, serde_json::to_string_pretty(tokens)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Saved tokens to {}", path.display());

    Ok(())
}

pub fn clear_tokens() -> Result<()> {
    let path = tokens_file()?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_template_parses() {
        let contents = render_template(CONFIG_TEMPLATE, "user@example.se", "hunter2").unwrap();
        let config = AppConfig::parse(&contents).unwrap();

        assert_eq!(config.credentials.username, "user@example.se");
        assert_eq!(config.credentials.password, "hunter2");
        assert!(Uuid::parse_str(&config.device.boot_uuid).is_ok());
        assert!(Uuid::parse_str(&config.device.device_uuid).is_ok());
        assert_ne!(config.device.boot_uuid, config.device.device_uuid);
        assert_eq!(config.stream.video_player.as_deref(), Some("mpv"));
        assert!(contents.contains("# Generated by --init"));
    }

    #[test]
    fn empty_device_identity_is_rejected() {
        assert!(AppConfig::parse(CONFIG_TEMPLATE).is_err());
    }
}
