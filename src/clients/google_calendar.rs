use std::fs;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serenity::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::models::event::{DateBoundary, EventRecord};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("calendar API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode calendar response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub installed: InstalledApp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledApp {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<i64>,
}

/// Token refresh happens out of band; requests only attach the stored
/// access token.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token: StoredToken,
}

impl OAuthCredentials {
    pub fn from_files(client_secret_path: &str, token_path: &str) -> Result<Self, String> {
        let secret_raw = fs::read_to_string(client_secret_path)
            .map_err(|e| format!("Failed to read {}: {}", client_secret_path, e))?;
        let secret: ClientSecret = serde_json::from_str(&secret_raw)
            .map_err(|e| format!("Invalid client secret {}: {}", client_secret_path, e))?;

        let token_raw =
            fs::read_to_string(token_path).map_err(|e| format!("Failed to read {}: {}", token_path, e))?;
        let token: StoredToken = serde_json::from_str(&token_raw)
            .map_err(|e| format!("Invalid token store {}: {}", token_path, e))?;

        Ok(Self {
            client_id: secret.installed.client_id,
            client_secret: secret.installed.client_secret,
            redirect_uri: secret.installed.redirect_uris.first().cloned().unwrap_or_default(),
            token,
        })
    }
}

/// `time_min` defaults to "now" when absent; an absent `time_max` leaves
/// the upper bound open.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventWindow {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn list_events(&self, window: &EventWindow) -> Result<Vec<EventRecord>, CalendarError>;
}

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    credentials: OAuthCredentials,
    calendar_id: String,
    max_results: u32,
}

impl GoogleCalendarClient {
    pub fn new(credentials: OAuthCredentials, calendar_id: String, max_results: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            calendar_id,
            max_results,
        }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(&self, window: &EventWindow) -> Result<Vec<EventRecord>, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events",
            API_BASE,
            urlencoding::encode(&self.calendar_id)
        );
        let query = build_query(window, self.max_results);
        debug!(%url, ?query, "listing calendar events");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.credentials.token.access_token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_events_response(&body)
    }
}

pub fn build_query(window: &EventWindow, max_results: u32) -> Vec<(&'static str, String)> {
    let time_min = window.time_min.unwrap_or_else(Utc::now);
    let mut query = vec![
        ("timeMin", time_min.to_rfc3339()),
        ("maxResults", max_results.to_string()),
        ("singleEvents", "true".to_string()),
        ("orderBy", "startTime".to_string()),
    ];
    if let Some(time_max) = window.time_max {
        query.push(("timeMax", time_max.to_rfc3339()));
    }
    query
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    #[serde(default)]
    summary: String,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
}

#[derive(Debug, Deserialize)]
struct ApiEventTime {
    date: Option<String>,
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

impl ApiEventTime {
    fn into_boundary(self) -> Option<DateBoundary> {
        if let Some(date) = self.date {
            Some(DateBoundary::AllDay(date))
        } else {
            self.date_time.map(DateBoundary::Timed)
        }
    }
}

pub fn parse_events_response(body: &str) -> Result<Vec<EventRecord>, CalendarError> {
    let parsed: EventsResponse = serde_json::from_str(body)?;
    Ok(parsed
        .items
        .into_iter()
        .map(|item| EventRecord {
            summary: item.summary,
            start: item.start.and_then(ApiEventTime::into_boundary),
            end: item.end.and_then(ApiEventTime::into_boundary),
        })
        .collect())
}
