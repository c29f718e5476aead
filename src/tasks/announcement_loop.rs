use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use tokio::time::sleep;
use tracing::{error, info};

use crate::clients::google_calendar::{CalendarApi, EventWindow};
use crate::handlers::sender::{ChannelTarget, ReplyTarget};
use crate::service::render::EventRenderer;

pub async fn run_announcement_loop(
    token: String,
    calendar: Arc<dyn CalendarApi>,
    renderer: EventRenderer,
    channel_id: String,
    interval: Duration,
) {
    let channel = match channel_id.parse::<u64>() {
        Ok(id) => ChannelId::new(id),
        Err(_) => {
            error!(%channel_id, "invalid announcements channel id, announcements disabled");
            return;
        }
    };

    let http = Arc::new(Http::new(&token));
    let target = ChannelTarget::new(http, channel);
    info!(channel = %channel, interval_secs = interval.as_secs(), "starting announcement loop");

    loop {
        sleep(interval).await;
        if let Err(err) = announcement_tick(calendar.as_ref(), &renderer, &target).await {
            error!(%err, "announcement round failed");
        }
    }
}

/// Posts the next upcoming event's line, or nothing when the calendar is
/// empty or the event has no renderable shape.
pub async fn announcement_tick(
    calendar: &dyn CalendarApi,
    renderer: &EventRenderer,
    target: &dyn ReplyTarget,
) -> Result<(), String> {
    let window = EventWindow {
        time_min: Some(Utc::now()),
        time_max: None,
    };
    let events = calendar.list_events(&window).await.map_err(|e| e.to_string())?;

    let Some(next) = events.first() else {
        return Ok(());
    };
    let Some(line) = renderer.render_line(next) else {
        return Ok(());
    };
    target.send_text(line.trim_end()).await
}
