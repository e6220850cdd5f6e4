//! `notewire config`: Print a default configuration file.

use notewire_config::AppConfig;

pub fn run() {
    println!("# Secrets are best supplied through TELEGRAM_BOT_TOKEN, YC_API_KEY and YC_FOLDER_ID.");
    print!("{}", AppConfig::default_toml());
}
