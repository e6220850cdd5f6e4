//! `notewire extract`: Run the extraction pipeline on text, deliver nothing.

use notewire_config::{ENV_API_KEY, ENV_FOLDER_ID};
use notewire_pipeline::Dispatcher;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    text: &str,
    raw: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let dispatcher = Dispatcher::from_config(&config)?;
    let Some(orchestrator) = dispatcher.orchestrator() else {
        return Err(format!("LLM credentials missing: set {ENV_API_KEY} and {ENV_FOLDER_ID}").into());
    };

    if raw {
        let value = orchestrator
            .extract(text)
            .await
            .ok_or("Both extraction attempts failed")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", orchestrator.run(text).await.markup());
    }

    Ok(())
}
