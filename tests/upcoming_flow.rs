use std::sync::Arc;
use std::time::Duration;

use calendarBot::clients::google_calendar::{CalendarApi, CalendarError, EventWindow};
use calendarBot::handlers::discord::{BotHandler, Disposition};
use calendarBot::handlers::sender::ReplyTarget;
use calendarBot::messages::MessageTemplates;
use calendarBot::models::event::EventRecord;
use calendarBot::service::render::EventRenderer;
use calendarBot::service::routing::Command;
use chrono_tz::Tz;
use serenity::async_trait;
use tokio::sync::Mutex;

enum FakeResponse {
    Events(Vec<EventRecord>),
    Error,
    Delay(Duration),
}

struct FakeCalendar {
    response: FakeResponse,
    calls: Mutex<u32>,
}

impl FakeCalendar {
    fn new(response: FakeResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: Mutex::new(0),
        })
    }

    async fn call_count(&self) -> u32 {
        *self.calls.lock().await
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn list_events(&self, _window: &EventWindow) -> Result<Vec<EventRecord>, CalendarError> {
        *self.calls.lock().await += 1;
        match &self.response {
            FakeResponse::Events(events) => Ok(events.clone()),
            FakeResponse::Error => Err(CalendarError::Api {
                status: 500,
                body: "boom".to_string(),
            }),
            FakeResponse::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(vec![])
            }
        }
    }
}

#[derive(Default)]
struct MockTarget {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ReplyTarget for MockTarget {
    async fn send_text(&self, content: &str) -> Result<(), String> {
        self.sent.lock().await.push(content.to_string());
        Ok(())
    }
}

fn handler(calendar: Arc<dyn CalendarApi>, admin_users: Vec<String>) -> BotHandler {
    let templates = Arc::new(MessageTemplates::default());
    let tz: Tz = "America/New_York".parse().unwrap();
    BotHandler::new(
        calendar,
        EventRenderer::new(templates.clone(), tz),
        templates,
        tz,
        admin_users,
        Duration::from_millis(200),
    )
}

fn command(name: &str) -> Command {
    Command {
        name: name.to_string(),
        args: vec![],
    }
}

#[tokio::test]
async fn upcoming_with_no_events_replies_no_upcoming() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![]));
    let handler = handler(calendar.clone(), vec![]);
    let target = MockTarget::default();

    let disposition = handler.dispatch(&target, "chan", "user", &command("upcoming")).await;

    assert_eq!(disposition, Disposition::Continue);
    let sent = target.sent.lock().await;
    assert_eq!(*sent, vec!["No upcoming events found."]);
}

#[tokio::test]
async fn upcoming_renders_fetched_events() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![EventRecord::all_day(
        "Launch party",
        "2024-06-01",
    )]));
    let handler = handler(calendar, vec![]);
    let target = MockTarget::default();

    handler.dispatch(&target, "chan", "user", &command("upcoming")).await;

    let sent = target.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Launch party is on 2024-06-01"));
}

#[tokio::test]
async fn provider_error_sends_no_reply() {
    let calendar = FakeCalendar::new(FakeResponse::Error);
    let handler = handler(calendar.clone(), vec![]);
    let target = MockTarget::default();

    handler.dispatch(&target, "chan", "user", &command("upcoming")).await;

    assert!(target.sent.lock().await.is_empty());
    assert_eq!(calendar.call_count().await, 1);
}

#[tokio::test]
async fn unrecognized_command_calls_nothing_and_sends_nothing() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![]));
    let handler = handler(calendar.clone(), vec![]);
    let target = MockTarget::default();

    let disposition = handler.dispatch(&target, "chan", "user", &command("dance")).await;

    assert_eq!(disposition, Disposition::Continue);
    assert!(target.sent.lock().await.is_empty());
    assert_eq!(calendar.call_count().await, 0);
}

#[tokio::test]
async fn help_sends_the_help_text() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![]));
    let handler = handler(calendar, vec![]);
    let target = MockTarget::default();

    handler.dispatch(&target, "chan", "user", &command("help")).await;

    let sent = target.sent.lock().await;
    assert_eq!(*sent, vec![MessageTemplates::default().help]);
}

#[tokio::test]
async fn shutdown_from_admin_is_honored() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![]));
    let handler = handler(calendar, vec!["admin".to_string()]);
    let target = MockTarget::default();

    let disposition = handler.dispatch(&target, "chan", "admin", &command("sudoku")).await;

    assert_eq!(disposition, Disposition::Shutdown);
    let sent = target.sent.lock().await;
    assert_eq!(*sent, vec!["Shutting down."]);
}

#[tokio::test]
async fn shutdown_from_non_admin_is_refused() {
    let calendar = FakeCalendar::new(FakeResponse::Events(vec![]));
    let handler = handler(calendar, vec!["admin".to_string()]);
    let target = MockTarget::default();

    let disposition = handler.dispatch(&target, "chan", "somebody", &command("sudoku")).await;

    assert_eq!(disposition, Disposition::Continue);
    let sent = target.sent.lock().await;
    assert_eq!(*sent, vec!["You are not allowed to do that."]);
}

#[tokio::test]
async fn slow_calendar_lookup_reports_a_timeout() {
    let calendar = FakeCalendar::new(FakeResponse::Delay(Duration::from_millis(600)));
    let handler = handler(calendar, vec![]);
    let target = MockTarget::default();

    handler.dispatch(&target, "chan", "user", &command("upcoming")).await;

    let sent = target.sent.lock().await;
    assert_eq!(*sent, vec![MessageTemplates::default().upcoming.timed_out]);
}

#[tokio::test]
async fn overlapping_upcoming_requests_for_one_target_are_dropped() {
    let calendar = FakeCalendar::new(FakeResponse::Delay(Duration::from_millis(100)));
    let handler = Arc::new(handler(calendar.clone(), vec![]));
    let first_target = Arc::new(MockTarget::default());
    let second_target = MockTarget::default();

    let first = {
        let handler = handler.clone();
        let target = first_target.clone();
        tokio::spawn(async move {
            handler.dispatch(target.as_ref(), "chan", "user", &command("upcoming")).await;
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Second request for the same target while the first is in flight.
    handler.dispatch(&second_target, "chan", "user", &command("upcoming")).await;
    assert!(second_target.sent.lock().await.is_empty());

    first.await.unwrap();
    assert_eq!(first_target.sent.lock().await.len(), 1);
    assert_eq!(calendar.call_count().await, 1);

    // The slot is released once the first lookup completes.
    handler.dispatch(&second_target, "chan", "user", &command("upcoming")).await;
    assert_eq!(second_target.sent.lock().await.len(), 1);
}
