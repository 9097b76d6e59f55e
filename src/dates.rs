use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DISPLAY_FORMAT: &str = "%a %b %d %Y";
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts a bare `YYYY-MM-DD` day or an RFC 3339 timestamp, which is mapped
/// to its calendar day in the local time zone.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_day_in(raw, &Local)
}

pub fn parse_day_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return is_supported(day).then_some(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(tz).date_naive());
    }
    // Local midnight of a day near the year bounds can land outside the four
    // digit years RFC 3339 allows; read back whatever `format_timestamp_in` wrote.
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz).date_naive())
}

/// Years 1 through 9999; entered days outside that range are refused.
pub fn is_supported(day: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&day.year())
}

/// Local midnight of `day`, written as a UTC timestamp with millisecond precision.
pub fn format_timestamp(day: NaiveDate) -> String {
    format_timestamp_in(day, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> String {
    // Midnight can fall into a DST gap; noon never does.
    let local_start = [(0, 0, 0), (12, 0, 0)]
        .iter()
        .filter_map(|&(h, m, s)| day.and_hms_opt(h, m, s))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|instant| instant.with_timezone(&Utc));
    let instant = match local_start {
        Some(instant) => instant,
        None => match day.and_hms_opt(0, 0, 0) {
            Some(naive) => Utc.from_utc_datetime(&naive),
            None => return day.format(DAY_FORMAT).to_string(),
        },
    };
    instant.format(TIMESTAMP_FORMAT).to_string()
}

pub fn display_day(day: NaiveDate) -> String {
    day.format(DISPLAY_FORMAT).to_string()
}

/// Serde adapter for due dates: written as timestamps, read back as calendar days.
pub mod day_timestamp {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America::New_York, Asia::Tokyo, Europe::London};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_day_accepts_plain_dates() {
        assert_eq!(parse_day("2024-05-01"), Some(day(2024, 5, 1)));
        assert_eq!(parse_day("  2024-12-31 "), Some(day(2024, 12, 31)));
        assert_eq!(parse_day("2024-02-30"), None);
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn parse_day_refuses_signed_and_extended_years() {
        assert_eq!(parse_day("-0001-01-01"), None);
        assert_eq!(parse_day("+10000-01-01"), None);
        assert_eq!(parse_day("0000-06-01"), None);
        assert_eq!(parse_day("0001-01-01"), Some(day(1, 1, 1)));
        assert_eq!(parse_day("9999-12-31"), Some(day(9999, 12, 31)));
    }

    #[test]
    fn boundary_days_read_back_in_any_zone() {
        let late = format_timestamp_in(day(9999, 12, 31), &New_York);
        assert!(late.starts_with("+10000-01-01T"), "{late}");
        assert_eq!(parse_day_in(&late, &New_York), Some(day(9999, 12, 31)));

        let early = format_timestamp_in(day(1, 1, 1), &Tokyo);
        assert_eq!(parse_day_in(&early, &Tokyo), Some(day(1, 1, 1)));
        let early = format_timestamp_in(day(1, 1, 1), &New_York);
        assert_eq!(parse_day_in(&early, &New_York), Some(day(1, 1, 1)));
    }

    #[test]
    fn parse_day_maps_timestamps_to_the_zone_calendar_day() {
        let raw = "2024-05-01T22:30:00.000Z";
        assert_eq!(parse_day_in(raw, &London), Some(day(2024, 5, 1)));
        assert_eq!(parse_day_in(raw, &Tokyo), Some(day(2024, 5, 2)));
        assert_eq!(parse_day_in(raw, &New_York), Some(day(2024, 5, 1)));

        let early = "2024-05-01T02:00:00.000Z";
        assert_eq!(parse_day_in(early, &New_York), Some(day(2024, 4, 30)));
    }

    #[test]
    fn format_timestamp_writes_local_midnight_in_utc() {
        assert_eq!(
            format_timestamp_in(day(2024, 5, 1), &Tokyo),
            "2024-04-30T15:00:00.000Z"
        );
        assert_eq!(
            format_timestamp_in(day(2024, 1, 15), &New_York),
            "2024-01-15T05:00:00.000Z"
        );
        assert_eq!(format_timestamp_in(day(2024, 5, 1), &Utc), "2024-05-01T00:00:00.000Z");
    }

    #[test]
    fn timestamp_round_trip_keeps_the_calendar_day() {
        for d in [day(2024, 3, 10), day(2024, 3, 31), day(2024, 11, 3), day(2025, 1, 1)] {
            let raw = format_timestamp_in(d, &New_York);
            assert_eq!(parse_day_in(&raw, &New_York), Some(d));
            let raw = format_timestamp_in(d, &Tokyo);
            assert_eq!(parse_day_in(&raw, &Tokyo), Some(d));
            assert_eq!(parse_day(&format_timestamp(d)), Some(d));
        }
    }

    #[test]
    fn display_day_matches_short_date_string() {
        assert_eq!(display_day(day(2024, 5, 1)), "Wed May 01 2024");
    }
}
