use std::fs;

use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub calendar_id: String,
    pub client_secret_path: String,
    pub token_file_path: String,
    #[serde(default = "default_max_results")]
    pub number_of_upcoming_events: u32,
    /// IANA name, used when rendering event times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// May shut the bot down. Empty disables the command.
    #[serde(default)]
    pub admin_users: Vec<String>,
    #[serde(default)]
    pub announcements_channel_id: Option<String>,
    #[serde(default = "default_announcement_interval")]
    pub announcement_interval_secs: u64,
    #[serde(default = "default_calendar_timeout")]
    pub calendar_timeout_secs: u64,
    #[serde(default)]
    pub messages_path: Option<String>,
}

fn default_max_results() -> u32 {
    10
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_announcement_interval() -> u64 {
    3600
}

fn default_calendar_timeout() -> u64 {
    30
}

impl BotConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&content).map_err(|e| format!("Invalid config {}: {}", path, e))
    }

    pub fn display_timezone(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| format!("Invalid timezone {}: {}", self.timezone, e))
    }
}
