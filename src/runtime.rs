use std::sync::Arc;
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use tracing::error;

use crate::clients::google_calendar::{CalendarApi, GoogleCalendarClient, OAuthCredentials};
use crate::config::BotConfig;
use crate::handlers::discord::{BotHandler, ShardManagerContainer};
use crate::messages::MessageTemplates;
use crate::service::render::EventRenderer;
use crate::tasks::announcement_loop;

pub async fn run_bot(config: BotConfig, templates: MessageTemplates, token: String) {
    let credentials = OAuthCredentials::from_files(&config.client_secret_path, &config.token_file_path)
        .expect("Failed to load calendar credentials");
    let timezone = config.display_timezone().expect("Invalid timezone in config");

    let calendar: Arc<dyn CalendarApi> = Arc::new(GoogleCalendarClient::new(
        credentials,
        config.calendar_id.clone(),
        config.number_of_upcoming_events,
    ));
    let templates = Arc::new(templates);
    let renderer = EventRenderer::new(templates.clone(), timezone);

    if let Some(channel_id) = config.announcements_channel_id.clone() {
        tokio::spawn(announcement_loop::run_announcement_loop(
            token.clone(),
            calendar.clone(),
            renderer.clone(),
            channel_id,
            Duration::from_secs(config.announcement_interval_secs),
        ));
    }

    let handler = BotHandler::new(
        calendar,
        renderer,
        templates,
        timezone,
        config.admin_users.clone(),
        Duration::from_secs(config.calendar_timeout_secs),
    );

    let intents =
        GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .expect("Error creating Serenity client");

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    // An unexpected disconnect is fatal; no reconnect attempt of our own.
    if let Err(why) = client.start().await {
        error!(?why, "client error, exiting");
        std::process::exit(1);
    }
}
