//! `notewire invoke`: Handle one function event, print the response.

use notewire_pipeline::Dispatcher;
use std::io::Read;
use std::path::{Path, PathBuf};

pub async fn run(
    config_path: Option<&Path>,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let raw = match file {
        Some(path) => std::fs::read(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let dispatcher = Dispatcher::from_config(&config)?;
    let response = notewire_gateway::handle_raw_event(&dispatcher, &raw).await;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
