//! Date handling for `date_of_join`.
//!
//! The API stores a calendar date but may echo it back as a full timestamp,
//! and the editor may hand us either form as well.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalise editor input to a calendar date.
///
/// Timestamps carrying an offset are converted to UTC before the time of day
/// is dropped; naive timestamps just lose their time of day.
pub fn normalize_input(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ts| ts.date())
}

/// Render a date the way it is submitted: always `YYYY-MM-DD`.
pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read the date portion of a value the server sent, ignoring any time of day.
pub fn parse_wire(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_wire))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_drops_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        for raw in [
            "2024-03-05",
            "2024-03-05T00:00:00Z",
            "2024-03-05T23:59:59.999Z",
            "2024-03-05T18:30:00",
            "2024-03-05 08:15:00",
            " 2024-03-05 ",
        ] {
            assert_eq!(normalize_input(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn offsets_are_converted_to_utc_first() {
        let date = normalize_input("2024-03-06T01:00:00+05:30").unwrap();
        assert_eq!(format(date), "2024-03-05");
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(normalize_input("next tuesday"), None);
        assert_eq!(normalize_input("2024-13-40"), None);
    }

    #[test]
    fn formatted_dates_are_ten_characters() {
        for raw in ["2001-01-01T12:00:00Z", "1999-12-31", "2030-07-04T06:07:08.123"] {
            let out = format(normalize_input(raw).unwrap());
            assert_eq!(out.len(), 10);
            assert_eq!(&out[4..5], "-");
            assert_eq!(&out[7..8], "-");
        }
    }

    #[test]
    fn wire_values_keep_their_date_prefix() {
        assert_eq!(
            parse_wire("2023-11-20T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2023, 11, 20)
        );
        assert_eq!(parse_wire(""), None);
    }
}
