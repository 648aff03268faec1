use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

/// 以本地時區取得今天的日期
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 回傳 `date` 往前推 `days` 天的日期
pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(TimeDelta::days(days))
        .unwrap_or(NaiveDate::MIN)
}

/// Formats a timestamp as ISO 8601 without a zone suffix.
///
/// The fractional part is written with microsecond precision and only when
/// it is non-zero, e.g. `2024-03-01T09:30:00` or `2024-03-01T09:30:00.250000`.
/// The value is the naive wall-clock time stored by the server, so clients
/// parsing it without a zone read it as their own local time.
pub fn to_iso_string(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micro)
            .unwrap()
    }

    #[test]
    fn test_to_iso_string_whole_seconds() {
        assert_eq!(to_iso_string(&at(2024, 3, 1, 9, 30, 0, 0)), "2024-03-01T09:30:00");
    }

    #[test]
    fn test_to_iso_string_fraction() {
        assert_eq!(
            to_iso_string(&at(2024, 3, 1, 9, 30, 0, 250_000)),
            "2024-03-01T09:30:00.250000"
        );
        assert_eq!(
            to_iso_string(&at(2024, 12, 31, 23, 59, 59, 1)),
            "2024-12-31T23:59:59.000001"
        );
    }

    #[test]
    fn test_days_before() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_before(date, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(days_before(date, 365), NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
        assert_eq!(days_before(date, 0), date);
    }
}
