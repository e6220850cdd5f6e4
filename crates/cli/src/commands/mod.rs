pub mod config_cmd;
pub mod doctor;
pub mod extract;
pub mod invoke;
pub mod serve;

use notewire_config::AppConfig;
use std::path::Path;

/// Load config from an explicit path, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config.validate()?;
            config
        }
        None => AppConfig::load()?,
    };
    Ok(config)
}
