//! Repeat-rule expansion for batch posting.
//!
//! A recurring posting is stored as one row per occurrence, all created in
//! one batch at posting time. This module turns an RFC 5545 repeat rule
//! into that batch of departure dates.

use chrono::{NaiveDate, NaiveTime};
use rrule::{RRuleSet, Tz as RRuleTz};

use crate::error::CoreError;

/// Upper bound on rows created by one recurring posting.
pub const MAX_BATCH_OCCURRENCES: u16 = 100;

/// Expands a repeat rule into the departure dates of a series, anchored at
/// the posting's first departure.
///
/// The rule must be bounded (`COUNT` or `UNTIL`); an open-ended rule would
/// otherwise silently truncate at the batch cap. `DTSTART` is derived from
/// the first departure date and time, so the rule itself carries only the
/// recurrence pattern.
pub fn expand_repeat_dates(
    rule: &str,
    first_date: NaiveDate,
    departure_time: NaiveTime,
) -> Result<Vec<NaiveDate>, CoreError> {
    let normalized = normalize_rule(rule, first_date, departure_time)?;

    let rrule_set: RRuleSet = normalized
        .parse()
        .map_err(|err| CoreError::InvalidRepeatRule(format!("{rule}: {err}")))?;

    let (occurrences, limited) = rrule_set.all(MAX_BATCH_OCCURRENCES);
    if limited {
        return Err(CoreError::InvalidRepeatRule(format!(
            "rule expands to more than {MAX_BATCH_OCCURRENCES} occurrences; bound it with COUNT or UNTIL"
        )));
    }
    if occurrences.is_empty() {
        return Err(CoreError::InvalidRepeatRule(
            "rule expands to no occurrences".to_string(),
        ));
    }

    let mut dates: Vec<NaiveDate> = occurrences.into_iter().map(|dt| dt.date_naive()).collect();
    dates.dedup();
    Ok(dates)
}

/// Prefixes the rule with a DTSTART derived from the first departure,
/// unless the caller already supplied one.
fn normalize_rule(
    rule: &str,
    first_date: NaiveDate,
    departure_time: NaiveTime,
) -> Result<String, CoreError> {
    let upper = rule.to_uppercase();
    if !upper.contains("COUNT=") && !upper.contains("UNTIL=") {
        return Err(CoreError::InvalidRepeatRule(
            "rule must be bounded with COUNT or UNTIL".to_string(),
        ));
    }

    if upper.contains("DTSTART") {
        return Ok(rule.to_string());
    }

    let dtstart = first_date
        .and_time(departure_time)
        .and_local_timezone(RRuleTz::UTC)
        .single()
        .ok_or_else(|| CoreError::InvalidRepeatRule("invalid first departure".to_string()))?;

    Ok(format!(
        "DTSTART:{}\nRRULE:{}",
        dtstart.format("%Y%m%dT%H%M%SZ"),
        rule
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn morning() -> NaiveTime {
        NaiveTime::from_hms_opt(7, 30, 0).unwrap()
    }

    #[test]
    fn weekly_count_expands_from_first_departure() {
        let dates = expand_repeat_dates("FREQ=WEEKLY;COUNT=3", date(2025, 2, 1), morning()).unwrap();
        assert_eq!(
            dates,
            vec![date(2025, 2, 1), date(2025, 2, 8), date(2025, 2, 15)]
        );
    }

    #[test]
    fn until_bound_is_accepted() {
        let dates =
            expand_repeat_dates("FREQ=DAILY;UNTIL=20250203T235959Z", date(2025, 2, 1), morning())
                .unwrap();
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn unbounded_rule_is_rejected() {
        let result = expand_repeat_dates("FREQ=WEEKLY", date(2025, 2, 1), morning());
        assert!(matches!(result, Err(CoreError::InvalidRepeatRule(_))));
    }

    #[test]
    fn malformed_rule_is_rejected() {
        let result = expand_repeat_dates("NOT_A_RULE;COUNT=3", date(2025, 2, 1), morning());
        assert!(matches!(result, Err(CoreError::InvalidRepeatRule(_))));
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let result = expand_repeat_dates("FREQ=DAILY;COUNT=500", date(2025, 2, 1), morning());
        assert!(matches!(result, Err(CoreError::InvalidRepeatRule(_))));
    }
}
