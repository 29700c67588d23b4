use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use vetro_types::{Resolution, VetroError};

/// Date-and-time patterns accepted for flexible string input, tried in order.
const DATETIME_PATTERNS: [&str; 7] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only patterns accepted for flexible string input, tried in order.
const DATE_PATTERNS: [&str; 12] = [
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%m.%d.%Y",
    "%Y%m%d",
    "%d%m%Y",
    "%m%d%Y",
];

/// A flexible point-in-time value accepted at the API surface.
///
/// Callers may hand over a raw Unix timestamp, an already-parsed datetime, or
/// one of the common textual date representations.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    /// Unix-epoch seconds, used as-is.
    Epoch(i64),
    /// A textual date: epoch digits, ISO-8601, or one of the fixed patterns.
    Text(String),
    /// An already-resolved datetime.
    DateTime(DateTime<Utc>),
}

impl TimeValue {
    /// Resolve to Unix-epoch seconds.
    ///
    /// Digit strings are taken as epoch seconds. ISO-8601 strings (with `Z`
    /// or a numeric offset) resolve through their offset; naive dates and
    /// datetimes are interpreted as UTC.
    ///
    /// # Errors
    /// Returns [`VetroError::Format`] when no supported representation
    /// matches.
    pub fn resolve(&self) -> Result<i64, VetroError> {
        match self {
            Self::Epoch(secs) => Ok(*secs),
            Self::DateTime(dt) => Ok(dt.timestamp()),
            Self::Text(text) => resolve_text(text),
        }
    }
}

impl From<i64> for TimeValue {
    fn from(secs: i64) -> Self {
        Self::Epoch(secs)
    }
}

impl From<DateTime<Utc>> for TimeValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn resolve_text(text: &str) -> Result<i64, VetroError> {
    let trimmed = text.trim();

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed
            .parse::<i64>()
            .map_err(|_| VetroError::format(format!("timestamp '{trimmed}' overflows")));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp());
    }

    for pattern in DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive.and_utc().timestamp());
        }
    }

    for pattern in DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            let naive = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| VetroError::format(format!("date '{trimmed}' has no midnight")))?;
            return Ok(naive.and_utc().timestamp());
        }
    }

    Err(VetroError::format(format!(
        "could not parse date value '{text}': provide a Unix timestamp or a recognized date format"
    )))
}

/// Derive the `since` timestamp that yields `limit` points ending at `now`.
///
/// # Errors
/// Returns [`VetroError::Config`] when `limit` is zero.
pub fn since_for_limit(resolution: Resolution, limit: u32, now: i64) -> Result<i64, VetroError> {
    if limit == 0 {
        return Err(VetroError::config("limit must be a positive integer"));
    }
    Ok(now - i64::from(limit) * resolution.step_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_and_digit_strings_pass_through() {
        assert_eq!(TimeValue::Epoch(1_600_000_000).resolve().unwrap(), 1_600_000_000);
        assert_eq!(
            TimeValue::from("1600000000").resolve().unwrap(),
            1_600_000_000
        );
    }

    #[test]
    fn iso_8601_with_zulu_offset() {
        assert_eq!(
            TimeValue::from("1970-01-02T00:00:00Z").resolve().unwrap(),
            86_400
        );
    }

    #[test]
    fn naive_patterns_resolve_as_utc() {
        for text in ["1970/01/02", "02/01/1970", "1970-01-02", "1970.01.02", "19700102"] {
            assert_eq!(TimeValue::from(text).resolve().unwrap(), 86_400, "{text}");
        }
        assert_eq!(
            TimeValue::from("1970-01-02 06:00:00").resolve().unwrap(),
            86_400 + 6 * 3_600
        );
    }

    #[test]
    fn unparseable_input_is_format_error() {
        assert!(matches!(
            TimeValue::from("next tuesday").resolve().unwrap_err(),
            VetroError::Format(_)
        ));
    }

    #[test]
    fn since_for_limit_steps_back_from_now() {
        let now = 1_000_000;
        assert_eq!(
            since_for_limit(Resolution::OneDay, 100, now).unwrap(),
            now - 100 * 86_400
        );
        assert!(matches!(
            since_for_limit(Resolution::OneDay, 0, now).unwrap_err(),
            VetroError::Config(_)
        ));
    }
}
