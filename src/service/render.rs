use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::messages::MessageTemplates;
use crate::models::event::{DateBoundary, EventRecord};
use crate::service::datefmt;

#[derive(Clone)]
pub struct EventRenderer {
    templates: Arc<MessageTemplates>,
    timezone: Tz,
}

impl EventRenderer {
    pub fn new(templates: Arc<MessageTemplates>, timezone: Tz) -> Self {
        Self { templates, timezone }
    }

    /// An empty input yields the no-upcoming message; a non-empty input
    /// whose events are all skipped returns the bare preamble.
    pub fn render(&self, events: &[EventRecord]) -> String {
        if events.is_empty() {
            return self.templates.upcoming.no_upcoming.clone();
        }

        let mut reply = self.templates.upcoming.found_upcoming.clone();
        for event in events {
            if let Some(line) = self.render_line(event) {
                reply.push_str(&line);
            }
        }
        reply
    }

    /// All-day starts win over timed ones; timed events need both
    /// boundaries or the line is skipped.
    pub fn render_line(&self, event: &EventRecord) -> Option<String> {
        match (&event.start, &event.end) {
            (Some(DateBoundary::AllDay(date)), _) => Some(
                self.templates
                    .upcoming
                    .all_day
                    .replace("{summary}", &event.summary)
                    .replace("{date}", date),
            ),
            (Some(DateBoundary::Timed(start)), Some(DateBoundary::Timed(end))) => {
                let parsed = (
                    datefmt::parse_event_timestamp(start),
                    datefmt::parse_event_timestamp(end),
                );
                let (start, end) = match parsed {
                    (Ok(start), Ok(end)) => (start, end),
                    _ => {
                        warn!(summary = %event.summary, "skipping event with malformed timestamps");
                        return None;
                    }
                };
                Some(
                    self.templates
                        .upcoming
                        .between
                        .replace("{summary}", &event.summary)
                        .replace("{start}", &datefmt::format_in_zone(start, self.timezone))
                        .replace("{end}", &datefmt::format_in_zone(end, self.timezone)),
                )
            }
            _ => {
                debug!(summary = %event.summary, "skipping event without a renderable start/end");
                None
            }
        }
    }
}
