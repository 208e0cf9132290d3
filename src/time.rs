//! Wall clock and timestamp formatting.
//!
//! chrono's `clock` feature is off (its `Utc::now()` panics on
//! wasm32-unknown-unknown), so "now" comes from `Date.now()` in the browser
//! and `SystemTime` elsewhere.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

pub fn now_utc() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_millis()).unwrap_or_default()
}

/// `2026-10-15T01:02:03.456Z`, the same shape as JS `toISOString()`.
pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp (offset or `Z`) into UTC.
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Japan Standard Time, `2026/10/15 10:02`.
pub fn format_jst(at: DateTime<Utc>) -> String {
    (at.naive_utc() + Duration::hours(9))
        .format("%Y/%m/%d %H:%M")
        .to_string()
}

/// Short relative label for history rows: たった今 / N分前 / N時間前 / N日前,
/// falling back to the JST date after a week.
pub fn elapsed_label(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(saved_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "たった今".to_string()
    } else if minutes < 60 {
        format!("{minutes}分前")
    } else if elapsed.num_hours() < 24 {
        format!("{}時間前", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}日前", elapsed.num_days())
    } else {
        format_jst(saved_at)
    }
}
