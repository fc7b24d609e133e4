use crate::config::WorldSettings;
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_yaml::from_reader(reader)?;
    Ok(config)
}

/// Load and validate world settings from a YAML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<WorldSettings, ConfigError> {
    let path = path.as_ref();
    let settings: WorldSettings = load_config(path)?;
    settings.validate()?;
    info!("loaded world settings from {}", path.display());
    Ok(settings)
}
