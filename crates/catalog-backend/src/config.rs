use std::path::PathBuf;

use catalog_bridge::config::Config;
use directories::ProjectDirs;
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Environment variable that overrides the configured API base address.
pub const API_URL_ENV: &str = "CATALOG_API_URL";

/// Errors that can occur while loading or resolving application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the default configuration to TOML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn config_file_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("dev", "catalog", "catalog-admin") {
        Some(dirs) => Ok(dirs.config_dir().join("config.toml")),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads the application configuration from disk, writing a default file on
/// first run. Returns the loaded config and the path it was read from.
pub async fn load_config() -> Result<(Config, PathBuf), ConfigError> {
    let config_path = config_file_path()?;
    let config = load_config_from(&config_path).await?;
    Ok((config, config_path))
}

/// Loads the configuration stored at `config_path`, creating it with
/// defaults when it does not exist yet.
pub async fn load_config_from(config_path: &std::path::Path) -> Result<Config, ConfigError> {
    log::info!("Loading configuration from {config_path:?}");
    if config_path.exists() {
        let contents = read_to_string(config_path).await?;
        let config: Config = toml::from_str(&contents)?;
        return Ok(config);
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(config)
}

/// Applies environment overrides on top of the loaded configuration.
///
/// `lookup` resolves a variable name to its value; the runtime passes
/// [`std::env::var`], tests pass a fixed table.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
        log::info!("Using API base address from {API_URL_ENV}: {base_url}");
        config.api.base_url = base_url.trim().to_string();
    }
}
