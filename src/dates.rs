//! Parsing for serialized .NET JSON dates: `/Date(1675800895000)/` or `/Date(1675800895000+0100)/`

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Default display format for parsed timestamps
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^/Date\((-?\d+)(?:([+-])(\d{2})(\d{2}))?\)/$").expect("valid date regex")
    })
}

/// Parse a `/Date(<millis>[+-HHMM])/` string.
///
/// The millisecond value is always UTC; the optional suffix only selects the
/// offset used when the instant is displayed. Returns `None` for anything else.
pub fn parse_dotnet_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let caps = date_pattern().captures(value)?;
    let millis: i64 = caps.get(1)?.as_str().parse().ok()?;
    let instant = Utc.timestamp_millis_opt(millis).single()?;

    let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(sign), Some(hh), Some(mm)) => {
            let hours: i32 = hh.as_str().parse().ok()?;
            let minutes: i32 = mm.as_str().parse().ok()?;
            let secs = hours * 3600 + minutes * 60;
            if sign.as_str() == "-" {
                FixedOffset::west_opt(secs)?
            } else {
                FixedOffset::east_opt(secs)?
            }
        }
        _ => FixedOffset::east_opt(0)?,
    };

    Some(instant.with_timezone(&offset))
}

/// Parse a JSON value that should hold a serialized date
pub fn parse_date_value(value: &serde_json::Value) -> Option<DateTime<FixedOffset>> {
    value.as_str().and_then(parse_dotnet_date)
}

/// Whether a strftime-style format string only uses known specifiers
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Format a serialized date for display, falling back to the raw string.
/// An unusable format string falls back to RFC 3339.
pub fn format_dotnet_date(value: &str, format: &str) -> String {
    match parse_dotnet_date(value) {
        Some(date) if is_valid_date_format(format) => date.format(format).to_string(),
        Some(date) => date.to_rfc3339(),
        None => value.to_string(),
    }
}
