use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parses an offset-aware event timestamp (`YYYY-MM-DDTHH:MM:SS±HH:MM`);
/// the offset is applied when converting to a display zone.
pub fn parse_event_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
}

/// Minute precision; seconds are dropped.
pub fn format_in_zone(instant: DateTime<FixedOffset>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%Y-%m-%d %H:%M").to_string()
}

/// Midnight at the start of the current day in `timezone`. When midnight
/// does not exist or is ambiguous (DST transitions), the earliest valid
/// interpretation wins.
pub fn start_of_today(timezone: Tz) -> DateTime<Tz> {
    let today = Utc::now().with_timezone(&timezone).date_naive();
    let midnight = today.and_time(NaiveTime::MIN);
    timezone
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| timezone.from_utc_datetime(&midnight))
}
