mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    debug!("Loading configuration from: {}", config_path);

    // Only an explicitly requested file has to exist
    let mut config = if explicit_path.is_some() || Path::new(&config_path).exists() {
        load_file(&config_path).await?
    } else {
        debug!("No configuration file found, using defaults");
        Config::default()
    };

    config.apply_env_overrides(|key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let config_str = tokio::fs::read_to_string(path).await?;
    from_yaml(&config_str)
}

pub fn from_yaml(source: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(source)?;
    Ok(config)
}

impl Config {
    /// Overlays `NLC_*` variables on top of file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("NLC_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("NLC_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("Invalid NLC_PORT: '{}'", port)))?;
        }
        if let Some(level) = lookup("NLC_LOG_LEVEL") {
            self.server.logs.level = level;
        }
        if let Some(url) = lookup("NLC_ENDPOINT_URL") {
            self.inference.endpoint_url = url;
        }
        if let Some(key) = lookup("NLC_API_KEY") {
            self.inference.api_key = key;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.inference.endpoint_url.trim().is_empty() {
            return Err(Error::config(
                "inference.endpoint_url is required (or set NLC_ENDPOINT_URL)",
            ));
        }
        if let Some(structuring) = &self.structuring {
            if structuring.scoring.endpoint_url.trim().is_empty() {
                return Err(Error::config("structuring.scoring.endpoint_url is empty"));
            }
        }
        Ok(())
    }
}
