//! `notewire doctor`: Diagnose configuration and reachability.

use notewire_channels::{TelegramChannel, TelegramConfig};
use notewire_config::{ENV_API_KEY, ENV_FOLDER_ID, ENV_TELEGRAM_TOKEN};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Notewire Doctor");
    println!("==================\n");

    let mut issues = 0;

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Ok(());
        }
    };

    let missing = config.missing_keys();
    for key in [ENV_TELEGRAM_TOKEN, ENV_API_KEY, ENV_FOLDER_ID] {
        if missing.contains(&key) {
            println!("  ⚠️  {key} is not set");
            issues += 1;
        } else {
            println!("  ✅ {key} set");
        }
    }

    println!("  ℹ️  Model:    {}", config.llm.model);
    println!("  ℹ️  Endpoint: {}", config.llm.endpoint);

    if let Some(tg) = TelegramConfig::from_app_config(&config) {
        let channel = TelegramChannel::new(tg)?;
        match channel.get_me().await {
            Ok(bot) => println!(
                "  ✅ Telegram reachable as @{}",
                bot.username.as_deref().unwrap_or(&bot.first_name)
            ),
            Err(e) => {
                println!("  ❌ Telegram getMe failed: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
