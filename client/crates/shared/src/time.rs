//! Date/time rendering and timestamp conversion
//!
//! Every rendering uses the fixed layout `YYYY/MM/DD HH:mm:ss` on a 24-hour
//! clock, with the year unpadded (`999/...`, `10000/...`). Free functions
//! render in the process local time zone; a [`DateFormatter`] carries an
//! explicit zone instead.
//!
//! An instant that cannot be represented (a stamp without a numeric prefix,
//! or one outside ±8.64e15 ms) renders as [`INVALID_DATE`]. No error is
//! raised for it, callers compare against the constant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::app_error::{AppError, AppResult};

/// Layout after the year; the year itself is printed unpadded
/// (`999/01/02`, `10000/01/02`)
const CLOCK_LAYOUT: &str = "%m/%d %H:%M:%S";

/// Rendering of an unrepresentable instant
pub const INVALID_DATE: &str = "Invalid Date";

/// Largest distance from the epoch, in milliseconds, that is still a valid date
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

// ============================================================================
// Timestamp input
// ============================================================================

/// Millisecond timestamp as received from callers
///
/// Older payloads send timestamps as strings, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    /// Milliseconds since the epoch, `None` when the text has no numeric prefix
    ///
    /// Text is read like an integer prefix: leading whitespace, an optional
    /// sign, then as many digits as are present (`"12abc"` reads as 12).
    /// A `0x` prefix switches to hexadecimal digits (`"0x1A"` reads as 26).
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            Timestamp::Millis(ms) => Some(*ms),
            Timestamp::Text(text) => parse_int_prefix(text),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Timestamp::Text(text)
    }
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        _ => (10, digits),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Overflowing i64 is far outside the valid date range anyway.
    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

// ============================================================================
// Zones
// ============================================================================

/// Output time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolve an IANA zone name (`"UTC"`, `"Asia/Shanghai"`, ...)
    pub fn named(name: &str) -> AppResult<Self> {
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| AppError::bad_request(format!("Unknown time zone: {name}")))
    }

    fn render(&self, instant: &DateTime<Utc>) -> String {
        match self {
            Zone::Local => layout(&instant.with_timezone(&Local)),
            Zone::Named(tz) => layout(&instant.with_timezone(tz)),
        }
    }
}

fn layout<Z>(date: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    format!("{}/{}", date.year(), date.format(CLOCK_LAYOUT))
}

impl FromStr for Zone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::named(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Renders instants in a fixed output zone
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatter {
    zone: Zone,
}

impl DateFormatter {
    /// Formatter for the process local time zone
    pub fn local() -> Self {
        Self { zone: Zone::Local }
    }

    pub fn in_zone(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn format_date<Z: TimeZone>(&self, date: &DateTime<Z>) -> String {
        self.zone.render(&date.with_timezone(&Utc))
    }

    pub fn format_date_by_timestamp(&self, ms: i64) -> String {
        match instant_from_millis(ms) {
            Some(instant) => self.zone.render(&instant),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Render a numeric or numeric-string millisecond timestamp
    ///
    /// With `time_zone` set, the wall clock of that zone is used instead of
    /// the formatter's own zone. An unknown zone name is an error; an
    /// unreadable stamp renders as [`INVALID_DATE`].
    pub fn timestamp_to_time(
        &self,
        stamp: impl Into<Timestamp>,
        time_zone: Option<&str>,
    ) -> AppResult<String> {
        let zone = match time_zone {
            Some(name) => Zone::named(name)?,
            None => self.zone,
        };

        let rendered = stamp
            .into()
            .to_millis()
            .and_then(instant_from_millis)
            .map(|instant| zone.render(&instant))
            .unwrap_or_else(|| INVALID_DATE.to_string());

        Ok(rendered)
    }
}

fn instant_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    if !(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&ms) {
        return None;
    }
    DateTime::from_timestamp_millis(ms)
}

// ============================================================================
// Free functions (local time zone)
// ============================================================================

/// Render `date` in the local time zone, e.g. `2024/11/12 16:38:19`
pub fn format_date<Z: TimeZone>(date: &DateTime<Z>) -> String {
    DateFormatter::local().format_date(date)
}

/// Render the instant `ms` milliseconds after the epoch in the local time zone
pub fn format_date_by_timestamp(ms: i64) -> String {
    DateFormatter::local().format_date_by_timestamp(ms)
}

/// Milliseconds since the epoch
pub fn date_to_ms_timestamp<Z: TimeZone>(date: &DateTime<Z>) -> i64 {
    date.timestamp_millis()
}

/// Whole seconds since the epoch, truncated toward zero
pub fn date_to_s_timestamp<Z: TimeZone>(date: &DateTime<Z>) -> i64 {
    date.timestamp_millis() / 1000
}

/// Render a millisecond timestamp, optionally in a named zone
pub fn timestamp_to_time(stamp: impl Into<Timestamp>, time_zone: Option<&str>) -> AppResult<String> {
    DateFormatter::local().timestamp_to_time(stamp, time_zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    const STAMP: i64 = 1_700_000_000_000;

    fn utc() -> DateFormatter {
        DateFormatter::in_zone(Zone::Named(chrono_tz::UTC))
    }

    #[test]
    fn test_format_date_layout() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(utc().format_date(&date), "2024/01/02 03:04:05");
    }

    #[test]
    fn test_format_date_by_timestamp() {
        assert_eq!(utc().format_date_by_timestamp(STAMP), "2023/11/14 22:13:20");
        assert_eq!(utc().format_date_by_timestamp(0), "1970/01/01 00:00:00");
    }

    #[test]
    fn test_format_date_matches_timestamp_rendering_locally() {
        let date = DateTime::from_timestamp_millis(STAMP).unwrap();
        assert_eq!(format_date(&date), format_date_by_timestamp(STAMP));
    }

    #[test]
    fn test_ms_timestamp() {
        let date = DateTime::from_timestamp_millis(1500).unwrap();
        assert_eq!(date_to_ms_timestamp(&date), 1500);
    }

    #[test]
    fn test_s_timestamp_truncates() {
        let date = DateTime::from_timestamp_millis(1500).unwrap();
        assert_eq!(date_to_s_timestamp(&date), 1);

        let date = DateTime::from_timestamp_millis(1999).unwrap();
        assert_eq!(date_to_s_timestamp(&date), 1);

        let before_epoch = DateTime::from_timestamp_millis(-1500).unwrap();
        assert_eq!(date_to_s_timestamp(&before_epoch), -1);
    }

    #[test]
    fn test_string_stamp_matches_numeric() {
        assert_eq!(
            timestamp_to_time("1700000000000", None).unwrap(),
            timestamp_to_time(STAMP, None).unwrap()
        );
        assert_eq!(
            timestamp_to_time(STAMP, None).unwrap(),
            format_date_by_timestamp(STAMP)
        );
    }

    #[test]
    fn test_named_zone_offsets() {
        let f = DateFormatter::local();
        assert_eq!(
            f.timestamp_to_time(STAMP, Some("UTC")).unwrap(),
            "2023/11/14 22:13:20"
        );
        assert_eq!(
            f.timestamp_to_time(STAMP, Some("Asia/Shanghai")).unwrap(),
            "2023/11/15 06:13:20"
        );
        assert_eq!(
            f.timestamp_to_time(STAMP, Some("America/New_York")).unwrap(),
            "2023/11/14 17:13:20"
        );
    }

    #[test]
    fn test_zone_argument_overrides_formatter_zone() {
        let shanghai = DateFormatter::in_zone(Zone::named("Asia/Shanghai").unwrap());
        assert_eq!(
            shanghai.timestamp_to_time(STAMP, Some("UTC")).unwrap(),
            "2023/11/14 22:13:20"
        );
        assert_eq!(
            shanghai.timestamp_to_time(STAMP, None).unwrap(),
            "2023/11/15 06:13:20"
        );
    }

    #[test]
    fn test_integer_prefix_reading() {
        assert_eq!(Timestamp::from("  1500ms").to_millis(), Some(1500));
        assert_eq!(Timestamp::from("-42").to_millis(), Some(-42));
        assert_eq!(Timestamp::from("+7").to_millis(), Some(7));
        assert_eq!(Timestamp::from("abc").to_millis(), None);
        assert_eq!(Timestamp::from("").to_millis(), None);
        assert_eq!(Timestamp::from("-").to_millis(), None);
    }

    #[test]
    fn test_hex_prefix_reading() {
        assert_eq!(Timestamp::from("0x1A").to_millis(), Some(26));
        assert_eq!(Timestamp::from("-0X10").to_millis(), Some(-16));
        assert_eq!(Timestamp::from("0x").to_millis(), None);
        assert_eq!(Timestamp::from("0x1G").to_millis(), Some(1));
    }

    #[test]
    fn test_year_is_unpadded() {
        let far = Utc.with_ymd_and_hms(10000, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(utc().format_date(&far), "10000/01/02 03:04:05");

        let early = Utc.with_ymd_and_hms(999, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(utc().format_date(&early), "999/01/02 03:04:05");
    }

    #[test]
    fn test_invalid_stamp_renders_invalid_date() {
        assert_eq!(timestamp_to_time("not a time", None).unwrap(), INVALID_DATE);
        assert_eq!(
            timestamp_to_time("not a time", Some("UTC")).unwrap(),
            INVALID_DATE
        );
    }

    #[test]
    fn test_out_of_range_renders_invalid_date() {
        assert_eq!(format_date_by_timestamp(MAX_EPOCH_MILLIS + 1), INVALID_DATE);
        assert_eq!(
            timestamp_to_time("99999999999999999999999", None).unwrap(),
            INVALID_DATE
        );
    }

    #[test]
    fn test_unknown_zone_is_error() {
        let err = timestamp_to_time(STAMP, Some("Mars/Olympus_Mons")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(Zone::Local.to_string(), "local");
        assert_eq!("Asia/Tokyo".parse::<Zone>().unwrap().to_string(), "Asia/Tokyo");
    }
}
