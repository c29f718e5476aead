use std::fs;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub help: String,
    pub shutting_down: String,
    pub not_authorized: String,
    pub upcoming: UpcomingTemplates,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpcomingTemplates {
    pub found_upcoming: String,
    /// Placeholders: {summary}, {date}
    pub all_day: String,
    /// Placeholders: {summary}, {start}, {end}
    pub between: String,
    pub no_upcoming: String,
    pub timed_out: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            help: "I watch the shared calendar.\nCommands:\n  help - show this message\n  upcoming - list upcoming events\n  sudoku - shut me down (admins only)".to_string(),
            shutting_down: "Shutting down.".to_string(),
            not_authorized: "You are not allowed to do that.".to_string(),
            upcoming: UpcomingTemplates::default(),
        }
    }
}

impl Default for UpcomingTemplates {
    fn default() -> Self {
        Self {
            found_upcoming: "Found these upcoming events:\n".to_string(),
            all_day: "{summary} is on {date}\n".to_string(),
            between: "{summary} is between {start} and {end}\n".to_string(),
            no_upcoming: "No upcoming events found.".to_string(),
            timed_out: "The calendar is taking too long to respond. Try again later.".to_string(),
        }
    }
}

impl MessageTemplates {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&content).map_err(|e| format!("Invalid message templates {}: {}", path, e))
    }
}
