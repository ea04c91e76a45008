//! Calendar date parsing for form input and the persisted date layout.

use chrono::{Duration, Local, NaiveDate};

use crate::error::{Error, Result};

/// Parse human-readable date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_date_input_from(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let lowered = s.trim().to_lowercase();

    match lowered.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = lowered.strip_prefix("in ") {
        let offset = if let Some(nd) = rest.strip_suffix('d') {
            nd.trim().parse::<i64>().ok().map(Duration::try_days)
        } else if let Some(nw) = rest.strip_suffix('w') {
            nw.trim().parse::<i64>().ok().map(Duration::try_weeks)
        } else {
            None
        };
        if let Some(offset) = offset {
            // Out-of-range offsets and dates past chrono's calendar are rejected.
            return offset
                .and_then(|o| today.checked_add_signed(o))
                .ok_or_else(|| Error::InvalidDate(s.to_string()));
        }
    }

    NaiveDate::parse_from_str(&lowered, "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse date input relative to the local calendar day.
pub fn parse_date_input(s: &str) -> Result<NaiveDate> {
    parse_date_input_from(s, Local::now().date_naive())
}

/// Serde adapter for optional dates that the board stores as `""` when unset.
pub mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => ser.collect_str(&d.format(FORMAT)),
            None => ser.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(de)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_inputs() {
        let today = day(2024, 3, 10);
        assert_eq!(parse_date_input_from("today", today).unwrap(), today);
        assert_eq!(parse_date_input_from("Tomorrow", today).unwrap(), day(2024, 3, 11));
        assert_eq!(parse_date_input_from("yesterday", today).unwrap(), day(2024, 3, 9));
        assert_eq!(parse_date_input_from("in 3d", today).unwrap(), day(2024, 3, 13));
        assert_eq!(parse_date_input_from("in 2w", today).unwrap(), day(2024, 3, 24));
    }

    #[test]
    fn iso_input_and_rejection() {
        let today = day(2024, 3, 10);
        assert_eq!(parse_date_input_from("2024-12-01", today).unwrap(), day(2024, 12, 1));
        assert!(matches!(parse_date_input_from("next-ish", today), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn huge_offsets_are_invalid_not_a_crash() {
        let today = day(2024, 3, 10);
        for input in ["in 999999999999d", "in 99999999999w", "in 9223372036854775807d", "in -999999999999d"] {
            assert!(
                matches!(parse_date_input_from(input, today), Err(Error::InvalidDate(_))),
                "{input}"
            );
        }
        assert_eq!(parse_date_input_from("in -2d", today).unwrap(), day(2024, 3, 8));
    }
}
