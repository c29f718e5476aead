#![allow(non_snake_case)]

use std::env;

use calendarBot::cli;
use calendarBot::config::BotConfig;
use calendarBot::messages::MessageTemplates;
use calendarBot::runtime;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_RUN_MODE: &str = "bot";
const DEFAULT_CONFIG_FILE: &str = "conf.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = BotConfig::from_file(&config_path).expect("Unable to load configuration.");

    let templates = match &config.messages_path {
        Some(path) => MessageTemplates::from_file(path).expect("Unable to load message templates."),
        None => MessageTemplates::default(),
    };

    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| DEFAULT_RUN_MODE.to_string());
    if run_mode == "bot" {
        let token = env::var("DISCORD_BOT_TOKEN").expect("DISCORD_BOT_TOKEN must be set for bot mode");
        runtime::run_bot(config, templates, token).await;
    } else if run_mode == "cli" {
        cli::cli(config, templates).await;
    } else {
        error!(%run_mode, "invalid run mode");
    }
}
