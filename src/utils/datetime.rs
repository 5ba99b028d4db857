use chrono::NaiveDateTime;

use crate::models::constants::{EVENT_DATE_TIME_FORMAT, EVENT_DATE_TIME_PARSE_FORMAT};

pub fn format_event_time(value: NaiveDateTime) -> String {
    value.format(EVENT_DATE_TIME_FORMAT).to_string()
}

/// Parses a client-supplied `yyyy-MM-dd H:mm` value. Surrounding whitespace
/// is not tolerated.
pub fn parse_event_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, EVENT_DATE_TIME_PARSE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    #[test]
    fn test_parse_accepts_single_and_double_digit_hours() {
        assert_eq!(parse_event_time("2024-05-01 18:00"), Some(at(18, 0)));
        assert_eq!(parse_event_time("2024-05-01 9:30"), Some(at(9, 30)));
        assert_eq!(parse_event_time("2024-05-01 09:30"), Some(at(9, 30)));
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(parse_event_time("").is_none());
        assert!(parse_event_time("01/05/2024 18:00").is_none());
        assert!(parse_event_time("2024-05-01T18:00").is_none());
        assert!(parse_event_time("2024-05-01 18:00:00").is_none());
        assert!(parse_event_time("2024-13-01 18:00").is_none());
        assert!(parse_event_time("2024-05-01 24:00").is_none());
    }

    #[test]
    fn test_format_drops_hour_padding() {
        assert_eq!(format_event_time(at(18, 0)), "2024-05-01 18:00");
        assert_eq!(format_event_time(at(9, 5)), "2024-05-01 9:05");
    }
}
