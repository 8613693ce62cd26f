use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

/// Layouts Jira uses for timestamps, tried in order before the RFC 3339 fallback.
const TIMESTAMP_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.3f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Layout used when writing timestamps back out.
pub const OUTPUT_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parse a Jira timestamp, trying every known encoding.
///
/// Accepts `2024-03-05T10:15:30.123-0500`, `2024-03-05T10:15:30+0000`,
/// RFC 3339 (`2024-03-05T10:15:30Z`, `...30.5+01:00`), and bare dates
/// (`2024-03-05`, read as midnight UTC). Returns `None` for anything else.
pub fn parse_jira_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Format a timestamp the way Jira emits it.
pub fn format_jira_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.format(OUTPUT_LAYOUT).to_string()
}
