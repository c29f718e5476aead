#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBoundary {
    AllDay(String),
    Timed(String),
}

/// Boundaries the provider omitted or sent in an unusable shape stay
/// `None`; the renderer decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub summary: String,
    pub start: Option<DateBoundary>,
    pub end: Option<DateBoundary>,
}

impl EventRecord {
    pub fn all_day(summary: &str, date: &str) -> Self {
        Self {
            summary: summary.to_string(),
            start: Some(DateBoundary::AllDay(date.to_string())),
            end: Some(DateBoundary::AllDay(date.to_string())),
        }
    }

    pub fn timed(summary: &str, start: &str, end: &str) -> Self {
        Self {
            summary: summary.to_string(),
            start: Some(DateBoundary::Timed(start.to_string())),
            end: Some(DateBoundary::Timed(end.to_string())),
        }
    }
}
