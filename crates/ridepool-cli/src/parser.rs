use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_english::{parse_date_string, Dialect};

pub fn parse_departure_date(date_str: &str) -> Result<NaiveDate> {
    parse_date_string(date_str, Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", date_str, e))
}

pub fn parse_departure_time(time_str: &str) -> Result<NaiveTime> {
    const FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I %p"];
    for format in FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(time_str, format) {
            return Ok(time);
        }
    }
    Err(anyhow::anyhow!("Failed to parse time '{}'", time_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rstest::rstest;

    #[rstest]
    #[case("07:30", 7, 30)]
    #[case("7:30 AM", 7, 30)]
    #[case("4:00 PM", 16, 0)]
    #[case("16:45:30", 16, 45)]
    fn parses_common_time_formats(#[case] input: &str, #[case] hour: u32, #[case] minute: u32) {
        let time = parse_departure_time(input).unwrap();
        assert_eq!(time.hour(), hour);
        assert_eq!(time.minute(), minute);
    }

    #[test]
    fn rejects_nonsense_time() {
        assert!(parse_departure_time("noonish").is_err());
    }

    #[test]
    fn parses_iso_dates() {
        let date = parse_departure_date("2025-02-01").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }
}
