use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use reel_client::ClientSettings;
use reel_core::PageLayout;
use serde::Deserialize;

use super::cli::Cli;
use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "docreel.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub upload_only: bool,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            server_url: client.base_url,
            output_dir: client.output_dir,
            log_level: "info".into(),
            log_destination: LogDestination::File,
            upload_only: false,
            connect_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            output_dir: self.output_dir.clone(),
        }
    }

    pub fn layout(&self) -> PageLayout {
        if self.upload_only {
            PageLayout::upload_only()
        } else {
            PageLayout::full()
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        reel_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Defaults, then the settings file, then `DOCREEL_*` environment, then flags.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, cli);
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing settings in {}", path.display()))
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DOCREEL_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("DOCREEL_OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("DOCREEL_LOG_LEVEL") {
        settings.log_level = v;
    }
}

fn apply_cli(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.server {
        settings.server_url = v.clone();
    }
    if let Some(v) = &cli.output_dir {
        settings.output_dir = v.clone();
    }
    if let Some(v) = &cli.log_level {
        settings.log_level = v.clone();
    }
    if let Some(v) = cli.log_destination {
        settings.log_destination = v;
    }
    if cli.upload_only {
        settings.upload_only = true;
    }
}
