//! Display grouping for ride listings.
//!
//! Pure functions that shape stored occurrences into what a listing shows:
//! return legs are folded into their departure leg, and a recurring series
//! collapses to its earliest occurrence. Nothing here touches the store.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Ride, TripDirection};

/// A display-only listing entry: one ride, optionally annotated with the
/// return leg's date and time when it represents a round trip. The stored
/// rows are never collapsed; this record exists purely for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct RideListing {
    #[serde(flatten)]
    pub ride: Ride,
    pub return_date: Option<NaiveDate>,
    pub return_time: Option<NaiveTime>,
}

impl RideListing {
    fn plain(ride: Ride) -> Self {
        Self {
            ride,
            return_date: None,
            return_time: None,
        }
    }
}

/// A recurring series gathered for display, with its identity derived from
/// the earliest member.
#[derive(Debug, Clone)]
pub struct SeriesGroup {
    pub group_id: Uuid,
    pub title: String,
    pub origin: String,
    pub destination: String,
    /// Members sorted by `(departure_date, id)` ascending
    pub rides: Vec<Ride>,
}

/// Keeps only occurrences that may stand alone in a listing: a return leg
/// is not an independent posting and never appears by itself.
pub fn departure_legs(occurrences: &[Ride]) -> Vec<Ride> {
    occurrences
        .iter()
        .filter(|ride| ride.trip_direction != TripDirection::Return)
        .cloned()
        .collect()
}

/// Partitions series members by group id. Each group's members are sorted
/// by `(departure_date, id)`; the group's title and endpoints come from its
/// earliest member; groups are ordered by their earliest member. A group of
/// size 1 (an orphaned series member) is returned unchanged.
pub fn series_groups(occurrences: &[Ride]) -> Vec<SeriesGroup> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut members: std::collections::HashMap<Uuid, Vec<Ride>> = std::collections::HashMap::new();

    for ride in occurrences {
        if let Some(group_id) = ride.series_group() {
            if !members.contains_key(&group_id) {
                order.push(group_id);
            }
            members.entry(group_id).or_default().push(ride.clone());
        }
    }

    let mut groups: Vec<SeriesGroup> = order
        .into_iter()
        .filter_map(|group_id| {
            let mut rides = members.remove(&group_id)?;
            rides.sort_by_key(Ride::series_key);
            let first = rides.first()?;
            Some(SeriesGroup {
                group_id,
                title: format!("{} → {}", first.origin, first.destination),
                origin: first.origin.clone(),
                destination: first.destination.clone(),
                rides,
            })
        })
        .collect();

    groups.sort_by_key(|group| {
        group
            .rides
            .first()
            .map(Ride::series_key)
            .unwrap_or((NaiveDate::MAX, Uuid::nil()))
    });
    groups
}

/// Merges a round-trip pair into one display record: the departure leg,
/// annotated with the return leg's date and time. Neither input is
/// modified.
pub fn merge_round_trip(departure_leg: &Ride, return_leg: &Ride) -> RideListing {
    RideListing {
        ride: departure_leg.clone(),
        return_date: Some(return_leg.departure_date),
        return_time: Some(return_leg.departure_time),
    }
}

/// Assembles the top-level listing: entries in first-encountered order with
/// every round-trip pair or series group replaced by its representative
/// (earliest occurrence by date, return leg merged in for pairs), finally
/// sorted by `(departure_date, departure_time, id)`.
pub fn assemble_listing(occurrences: &[Ride]) -> Vec<RideListing> {
    let mut seen_groups: HashSet<Uuid> = HashSet::new();
    let mut entries: Vec<RideListing> = Vec::new();

    for leg in departure_legs(occurrences) {
        match leg.round_trip_group_id {
            Some(group_id) => {
                if !seen_groups.insert(group_id) {
                    continue;
                }
                if let Some(entry) = group_representative(group_id, occurrences) {
                    entries.push(entry);
                }
            }
            None => entries.push(RideListing::plain(leg)),
        }
    }

    entries.sort_by(|a, b| {
        (a.ride.departure_date, a.ride.departure_time, a.ride.id).cmp(&(
            b.ride.departure_date,
            b.ride.departure_time,
            b.ride.id,
        ))
    });
    entries
}

/// One entry for a shared group: the earliest standalone member for a
/// series, or the departure leg with return info merged in for a pair.
fn group_representative(group_id: Uuid, occurrences: &[Ride]) -> Option<RideListing> {
    let members: Vec<&Ride> = occurrences
        .iter()
        .filter(|ride| ride.round_trip_group_id == Some(group_id))
        .collect();

    if members.iter().any(|ride| ride.is_recurring) {
        let first = members
            .iter()
            .filter(|ride| ride.trip_direction != TripDirection::Return)
            .min_by_key(|ride| ride.series_key())?;
        return Some(RideListing::plain((*first).clone()));
    }

    let departure = members
        .iter()
        .find(|ride| ride.trip_direction == TripDirection::Departure)?;
    match members
        .iter()
        .find(|ride| ride.trip_direction == TripDirection::Return)
    {
        Some(return_leg) => Some(merge_round_trip(departure, return_leg)),
        None => Some(RideListing::plain((*departure).clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostingType, RideStatus};
    use chrono::{NaiveTime, Utc};

    fn test_ride(origin: &str, destination: &str, date: (i32, u32, u32)) -> Ride {
        Ride {
            id: Uuid::now_v7(),
            poster_id: Uuid::now_v7(),
            posting_type: PostingType::Driver,
            origin: origin.to_string(),
            destination: destination.to_string(),
            origin_lat: None,
            origin_lng: None,
            destination_lat: None,
            destination_lng: None,
            departure_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            is_round_trip: false,
            trip_direction: TripDirection::None,
            round_trip_group_id: None,
            is_recurring: false,
            status: RideStatus::Active,
            seats: 3,
            price_per_seat: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn round_trip_pair(group_id: Uuid) -> (Ride, Ride) {
        let mut departure = test_ride("San Francisco", "South Lake Tahoe", (2025, 2, 1));
        departure.is_round_trip = true;
        departure.trip_direction = TripDirection::Departure;
        departure.round_trip_group_id = Some(group_id);

        let mut return_leg = test_ride("South Lake Tahoe", "San Francisco", (2025, 2, 8));
        return_leg.is_round_trip = true;
        return_leg.trip_direction = TripDirection::Return;
        return_leg.round_trip_group_id = Some(group_id);
        return_leg.poster_id = departure.poster_id;

        (departure, return_leg)
    }

    fn series_of(group_id: Uuid, dates: &[(i32, u32, u32)]) -> Vec<Ride> {
        dates
            .iter()
            .map(|&date| {
                let mut ride = test_ride("Oakland", "Sacramento", date);
                ride.round_trip_group_id = Some(group_id);
                ride.is_recurring = true;
                ride
            })
            .collect()
    }

    mod departure_legs_tests {
        use super::*;

        #[test]
        fn never_returns_a_return_leg() {
            let (departure, return_leg) = round_trip_pair(Uuid::now_v7());
            let legs = departure_legs(&[departure.clone(), return_leg]);

            assert_eq!(legs.len(), 1);
            assert_eq!(legs[0].id, departure.id);
            assert!(legs
                .iter()
                .all(|ride| ride.trip_direction != TripDirection::Return));
        }

        #[test]
        fn keeps_plain_and_departure_legs() {
            let plain = test_ride("A", "B", (2025, 3, 1));
            let (departure, return_leg) = round_trip_pair(Uuid::now_v7());
            let legs = departure_legs(&[plain.clone(), departure.clone(), return_leg]);

            assert_eq!(legs.len(), 2);
            assert_eq!(legs[0].id, plain.id);
            assert_eq!(legs[1].id, departure.id);
        }
    }

    mod series_groups_tests {
        use super::*;

        #[test]
        fn partitions_and_sorts_members() {
            let group_a = Uuid::now_v7();
            let group_b = Uuid::now_v7();
            let mut rides = series_of(group_b, &[(2025, 3, 10), (2025, 3, 3)]);
            rides.extend(series_of(group_a, &[(2025, 2, 1), (2025, 2, 8)]));
            rides.push(test_ride("solo", "trip", (2025, 1, 1)));

            let groups = series_groups(&rides);

            assert_eq!(groups.len(), 2);
            // Groups ordered by earliest member's date
            assert_eq!(groups[0].group_id, group_a);
            assert_eq!(groups[1].group_id, group_b);
            // Members ordered within the group
            assert_eq!(
                groups[1].rides[0].departure_date,
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
            );
        }

        #[test]
        fn derives_identity_from_earliest_member() {
            let group_id = Uuid::now_v7();
            let mut late = test_ride("Reno", "Carson City", (2025, 4, 2));
            late.round_trip_group_id = Some(group_id);
            late.is_recurring = true;
            let mut early = test_ride("Oakland", "Sacramento", (2025, 4, 1));
            early.round_trip_group_id = Some(group_id);
            early.is_recurring = true;

            let groups = series_groups(&[late, early]);

            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].origin, "Oakland");
            assert_eq!(groups[0].destination, "Sacramento");
            assert_eq!(groups[0].title, "Oakland → Sacramento");
        }

        #[test]
        fn singleton_group_is_preserved() {
            let rides = series_of(Uuid::now_v7(), &[(2025, 5, 1)]);
            let groups = series_groups(&rides);

            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].rides.len(), 1);
        }

        #[test]
        fn regrouping_is_idempotent() {
            let mut rides = series_of(Uuid::now_v7(), &[(2025, 2, 1), (2025, 2, 8)]);
            rides.extend(series_of(Uuid::now_v7(), &[(2025, 6, 1)]));

            let once = series_groups(&rides);
            let flattened: Vec<Ride> = once.iter().flat_map(|g| g.rides.clone()).collect();
            let twice = series_groups(&flattened);

            assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(twice.iter()) {
                assert_eq!(a.group_id, b.group_id);
                assert_eq!(
                    a.rides.iter().map(|r| r.id).collect::<Vec<_>>(),
                    b.rides.iter().map(|r| r.id).collect::<Vec<_>>()
                );
            }
        }

        #[test]
        fn round_trip_pairs_are_not_series() {
            let (departure, return_leg) = round_trip_pair(Uuid::now_v7());
            assert!(series_groups(&[departure, return_leg]).is_empty());
        }
    }

    mod merge_round_trip_tests {
        use super::*;

        #[test]
        fn copies_return_date_and_time_without_mutating() {
            let (departure, return_leg) = round_trip_pair(Uuid::now_v7());
            let before_departure = departure.clone();
            let before_return = return_leg.clone();

            let merged = merge_round_trip(&departure, &return_leg);

            assert_eq!(merged.ride, before_departure);
            assert_eq!(merged.return_date, Some(return_leg.departure_date));
            assert_eq!(merged.return_time, Some(return_leg.departure_time));
            assert_eq!(departure, before_departure);
            assert_eq!(return_leg, before_return);
        }
    }

    mod assemble_listing_tests {
        use super::*;

        #[test]
        fn round_trip_shows_one_merged_record() {
            let (departure, return_leg) = round_trip_pair(Uuid::now_v7());
            let listing = assemble_listing(&[departure.clone(), return_leg]);

            assert_eq!(listing.len(), 1);
            assert_eq!(listing[0].ride.id, departure.id);
            assert_eq!(
                listing[0].return_date,
                Some(NaiveDate::from_ymd_opt(2025, 2, 8).unwrap())
            );
        }

        #[test]
        fn series_collapses_to_earliest_occurrence() {
            let group_id = Uuid::now_v7();
            let rides = series_of(group_id, &[(2025, 2, 8), (2025, 2, 1), (2025, 2, 15)]);
            let listing = assemble_listing(&rides);

            assert_eq!(listing.len(), 1);
            assert_eq!(
                listing[0].ride.departure_date,
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
            );
        }

        #[test]
        fn orphaned_return_leg_is_dropped() {
            let (_, return_leg) = round_trip_pair(Uuid::now_v7());
            assert!(assemble_listing(&[return_leg]).is_empty());
        }

        #[test]
        fn entries_sorted_by_departure() {
            let late = test_ride("C", "D", (2025, 3, 2));
            let early = test_ride("A", "B", (2025, 3, 1));
            let listing = assemble_listing(&[late.clone(), early.clone()]);

            assert_eq!(listing[0].ride.id, early.id);
            assert_eq!(listing[1].ride.id, late.id);
        }
    }
}
