use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// An ordered list of names under a config section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameList {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Static configuration shared by both tools: the valid contacts and the
/// services that can be attached to a release note. Loaded once per session
/// and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contacts: NameList,
    #[serde(default)]
    pub services: NameList,
}

impl Config {
    /// Loads the configuration from the provided path. A missing or
    /// unparseable file is a hard error; callers treat it as fatal to
    /// session start.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn contact_names(&self) -> &[String] {
        &self.contacts.names
    }

    pub fn service_names(&self) -> &[String] {
        &self.services.names
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    // Check if RENO_CONFIG_PATH environment variable is set
    if let Ok(path) = std::env::var("RENO_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    // Prefer a config.toml next to the working directory
    let local = PathBuf::from("config.toml");
    if local.exists() {
        return Ok(local);
    }

    // Default to ~/.reno.toml
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

    Ok(home_dir.join(".reno.toml"))
}
