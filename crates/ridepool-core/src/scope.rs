//! Scope resolution for series mutations.
//!
//! Given an anchor occurrence and its series siblings, computes the exact
//! set of occurrences a mutation will touch, plus the literal per-scope
//! counts a caller must see before committing a destructive action.

use crate::models::{EditScope, Ride};

/// Resolves the target set for a mutation. `siblings` is the anchor's full
/// series (anchor included), as fetched per group id; for a posting that is
/// not a series member every scope collapses to the anchor alone.
///
/// - `Single`: exactly the anchor.
/// - `Future`: every sibling whose `departure_date` is on or after the
///   anchor's date. The comparison is date-only and inclusive, so the
///   anchor is always part of its own future.
/// - `Series`: every sibling, past dates included.
///
/// The result is sorted by `(departure_date, id)`.
pub fn resolve_targets(anchor: &Ride, siblings: &[Ride], scope: EditScope) -> Vec<Ride> {
    if !anchor.is_series_member() {
        return vec![anchor.clone()];
    }

    let mut targets: Vec<Ride> = match scope {
        EditScope::Single => vec![anchor.clone()],
        EditScope::Future => siblings
            .iter()
            .filter(|ride| ride.departure_date >= anchor.departure_date)
            .cloned()
            .collect(),
        EditScope::Series => siblings.to_vec(),
    };
    targets.sort_by_key(Ride::series_key);
    targets
}

/// Literal target counts per scope, computed before the caller commits.
/// `future` is `None` when that option would be equivalent to `single`
/// (target set of size <= 1) and must not be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeOptions {
    pub single: usize,
    pub future: Option<usize>,
    pub series: usize,
}

impl ScopeOptions {
    pub fn compute(anchor: &Ride, siblings: &[Ride]) -> Self {
        let series = resolve_targets(anchor, siblings, EditScope::Series).len();
        let future_count = resolve_targets(anchor, siblings, EditScope::Future).len();
        Self {
            single: 1,
            future: if future_count > 1 {
                Some(future_count)
            } else {
                None
            },
            series,
        }
    }

    /// The literal count for a scope, `None` when the scope is unavailable.
    pub fn count_for(&self, scope: EditScope) -> Option<usize> {
        match scope {
            EditScope::Single => Some(self.single),
            EditScope::Future => self.future,
            EditScope::Series => Some(self.series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostingType, RideStatus, TripDirection};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn series(dates: &[(i32, u32, u32)]) -> Vec<Ride> {
        let group_id = Uuid::now_v7();
        let poster_id = Uuid::now_v7();
        let mut rides: Vec<Ride> = dates
            .iter()
            .map(|&(y, m, d)| Ride {
                id: Uuid::now_v7(),
                poster_id,
                posting_type: PostingType::Driver,
                origin: "Oakland".to_string(),
                destination: "Sacramento".to_string(),
                origin_lat: None,
                origin_lng: None,
                destination_lat: None,
                destination_lng: None,
                departure_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                is_round_trip: false,
                trip_direction: TripDirection::None,
                round_trip_group_id: Some(group_id),
                is_recurring: true,
                status: RideStatus::Active,
                seats: 3,
                price_per_seat: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect();
        rides.sort_by_key(Ride::series_key);
        rides
    }

    const DATES: [(i32, u32, u32); 3] = [(2025, 2, 1), (2025, 2, 8), (2025, 2, 15)];

    #[test]
    fn series_scope_targets_every_member_from_any_anchor() {
        let rides = series(&DATES);
        for anchor in &rides {
            let targets = resolve_targets(anchor, &rides, EditScope::Series);
            assert_eq!(targets.len(), rides.len());
        }
    }

    #[test]
    fn future_scope_targets_anchor_and_later_inclusive() {
        let rides = series(&DATES);
        for (index, anchor) in rides.iter().enumerate() {
            let targets = resolve_targets(anchor, &rides, EditScope::Future);
            assert_eq!(targets.len(), rides.len() - index);
            // The anchor's own date is included
            assert!(targets.iter().any(|ride| ride.id == anchor.id));
        }
    }

    #[test]
    fn single_scope_targets_exactly_the_anchor() {
        let rides = series(&DATES);
        let targets = resolve_targets(&rides[1], &rides, EditScope::Single);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, rides[1].id);
    }

    #[test]
    fn non_member_anchor_collapses_every_scope() {
        let mut rides = series(&DATES);
        let mut solo = rides.remove(0);
        solo.round_trip_group_id = None;
        solo.is_recurring = false;

        for scope in [EditScope::Single, EditScope::Future, EditScope::Series] {
            let targets = resolve_targets(&solo, &rides, scope);
            assert_eq!(targets.len(), 1);
            assert_eq!(targets[0].id, solo.id);
        }
    }

    #[test]
    fn date_ties_break_by_id() {
        let mut rides = series(&[(2025, 2, 1), (2025, 2, 1), (2025, 2, 8)]);
        rides.sort_by_key(Ride::series_key);
        let targets = resolve_targets(&rides[0], &rides, EditScope::Series);
        let ids: Vec<_> = targets.iter().map(|ride| ride.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids[..2].to_vec(), sorted[..2].to_vec());
    }

    mod scope_options_tests {
        use super::*;

        #[test]
        fn future_unavailable_on_last_occurrence() {
            let rides = series(&DATES);
            let options = ScopeOptions::compute(&rides[2], &rides);
            assert_eq!(options.single, 1);
            assert_eq!(options.future, None);
            assert_eq!(options.series, 3);
        }

        #[test]
        fn future_counts_anchor_and_later() {
            let rides = series(&DATES);
            let options = ScopeOptions::compute(&rides[1], &rides);
            assert_eq!(options.future, Some(2));
            assert_eq!(options.count_for(EditScope::Future), Some(2));
        }

        #[test]
        fn non_member_offers_single_only() {
            let rides = series(&[(2025, 2, 1)]);
            let mut solo = rides[0].clone();
            solo.round_trip_group_id = None;
            solo.is_recurring = false;

            let options = ScopeOptions::compute(&solo, &[solo.clone()]);
            assert_eq!(options.future, None);
            assert_eq!(options.series, 1);
        }
    }
}
