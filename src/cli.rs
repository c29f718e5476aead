use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

use crate::clients::google_calendar::{CalendarApi, EventWindow, GoogleCalendarClient, OAuthCredentials};
use crate::config::BotConfig;
use crate::messages::MessageTemplates;
use crate::service::datefmt;
use crate::service::render::EventRenderer;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming calendar events without connecting to Discord.
    Upcoming {
        /// Limit the window to this many days from today.
        #[arg(long)]
        days: Option<i64>,
    },
}

pub async fn cli(config: BotConfig, templates: MessageTemplates) {
    // Fine to panic here
    let cli = Cli::parse();
    let credentials = OAuthCredentials::from_files(&config.client_secret_path, &config.token_file_path)
        .expect("Failed to load calendar credentials");
    let timezone = config.display_timezone().expect("Invalid timezone in config");

    let calendar = GoogleCalendarClient::new(
        credentials,
        config.calendar_id.clone(),
        config.number_of_upcoming_events,
    );
    let renderer = EventRenderer::new(Arc::new(templates), timezone);

    match cli.command {
        Commands::Upcoming { days } => {
            let start = datefmt::start_of_today(timezone).with_timezone(&Utc);
            let window = EventWindow {
                time_min: Some(start),
                time_max: days.map(|d| start + Duration::days(d)),
            };
            match calendar.list_events(&window).await {
                Ok(events) => println!("{}", renderer.render(&events)),
                Err(err) => println!("Failed to list events: {}", err),
            }
        }
    }
}
