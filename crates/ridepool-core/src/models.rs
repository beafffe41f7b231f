use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostingType {
    Driver,
    Passenger,
    Flexible,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid posting type: {0}")]
pub struct ParsePostingTypeError(String);

impl FromStr for PostingType {
    type Err = ParsePostingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driver" => Ok(PostingType::Driver),
            "passenger" => Ok(PostingType::Passenger),
            "flexible" => Ok(PostingType::Flexible),
            _ => Err(ParsePostingTypeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for PostingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostingType::Driver => write!(f, "driver"),
            PostingType::Passenger => write!(f, "passenger"),
            PostingType::Flexible => write!(f, "flexible"),
        }
    }
}

/// Leg direction within a round trip. `None` for every posting that is not
/// part of a round-trip pair (invariant: direction is only departure/return
/// when `is_round_trip` is set).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripDirection {
    Departure,
    Return,
    None,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid trip direction: {0}")]
pub struct ParseTripDirectionError(String);

impl FromStr for TripDirection {
    type Err = ParseTripDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "departure" => Ok(TripDirection::Departure),
            "return" => Ok(TripDirection::Return),
            "none" => Ok(TripDirection::None),
            _ => Err(ParseTripDirectionError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TripDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripDirection::Departure => write!(f, "departure"),
            TripDirection::Return => write!(f, "return"),
            TripDirection::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Active,
    Inactive,
    Completed,
    Cancelled,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid ride status: {0}")]
pub struct ParseRideStatusError(String);

impl FromStr for RideStatus {
    type Err = ParseRideStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(RideStatus::Active),
            "inactive" => Ok(RideStatus::Inactive),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            _ => Err(ParseRideStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RideStatus::Active => write!(f, "active"),
            RideStatus::Inactive => write!(f, "inactive"),
            RideStatus::Completed => write!(f, "completed"),
            RideStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One dated ride posting. A recurring itinerary is stored as one row per
/// occurrence; a round trip as two rows. Pairing and series membership are
/// carried by `round_trip_group_id` + `is_recurring` and are immutable after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Ride {
    /// Primary key, UUIDv7 so the id tiebreak in series ordering is stable
    pub id: Uuid,
    /// Owner reference; every mutation checks the requester against this
    pub poster_id: Uuid,
    pub posting_type: PostingType,
    pub origin: String,
    pub destination: String,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    /// Calendar date of departure; series ordering key together with `id`
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub is_round_trip: bool,
    /// departure/return only when `is_round_trip` is set, `none` otherwise
    pub trip_direction: TripDirection,
    /// Shared by all rows of a series or a round-trip pair
    pub round_trip_group_id: Option<Uuid>,
    pub is_recurring: bool,
    pub status: RideStatus,
    pub seats: i64,
    /// Price in minor currency units; not relevant to the series core
    pub price_per_seat: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    /// A posting is a series member iff it carries a group id AND is
    /// recurring. A round-trip pair shares a group id without being a
    /// series.
    pub fn is_series_member(&self) -> bool {
        self.round_trip_group_id.is_some() && self.is_recurring
    }

    /// The series group id, present only for actual series members.
    pub fn series_group(&self) -> Option<Uuid> {
        if self.is_recurring {
            self.round_trip_group_id
        } else {
            None
        }
    }

    /// Series ordering key: `(departure_date, id)` ascending, id breaking
    /// date ties deterministically.
    pub fn series_key(&self) -> (NaiveDate, Uuid) {
        (self.departure_date, self.id)
    }
}

/// Data required to create a new ride posting. Exactly one batch shape is
/// produced per posting: a single row, a round-trip pair (when
/// `return_date`/`return_time` are set), or a recurring series (when
/// `repeat_rule` is set).
#[derive(Debug, Clone)]
pub struct NewRideData {
    pub poster_id: Uuid,
    pub posting_type: PostingType,
    pub origin: String,
    pub destination: String,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub seats: i64,
    pub price_per_seat: Option<i64>,
    pub notes: Option<String>,
    /// When set, a return leg is created with origin/destination swapped
    pub return_date: Option<NaiveDate>,
    pub return_time: Option<NaiveTime>,
    /// Raw RFC 5545 repeat rule; when set, one row per expanded date is
    /// created, all sharing a fresh group id with `is_recurring = true`
    pub repeat_rule: Option<String>,
}

impl NewRideData {
    pub fn new(
        poster_id: Uuid,
        posting_type: PostingType,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        departure_time: NaiveTime,
    ) -> Self {
        Self {
            poster_id,
            posting_type,
            origin: origin.into(),
            destination: destination.into(),
            origin_lat: None,
            origin_lng: None,
            destination_lat: None,
            destination_lng: None,
            departure_date,
            departure_time,
            seats: 1,
            price_per_seat: None,
            notes: None,
            return_date: None,
            return_time: None,
            repeat_rule: None,
        }
    }
}

/// Allow-listed patch for scoped updates. Identity, ownership, and
/// series/round-trip membership (`id`, `poster_id`, `created_at`,
/// `round_trip_group_id`, `is_recurring`, `trip_direction`,
/// `is_round_trip`) are not representable here.
#[derive(Debug, Clone, Default)]
pub struct RidePatch {
    pub posting_type: Option<PostingType>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub origin_lat: Option<Option<f64>>,
    pub origin_lng: Option<Option<f64>>,
    pub destination_lat: Option<Option<f64>>,
    pub destination_lng: Option<Option<f64>>,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<NaiveTime>,
    pub seats: Option<i64>,
    pub price_per_seat: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
    pub status: Option<RideStatus>,
}

impl RidePatch {
    pub fn is_empty(&self) -> bool {
        self.posting_type.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.origin_lat.is_none()
            && self.origin_lng.is_none()
            && self.destination_lat.is_none()
            && self.destination_lng.is_none()
            && self.departure_date.is_none()
            && self.departure_time.is_none()
            && self.seats.is_none()
            && self.price_per_seat.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }

    /// Boundary validation: an empty patch and malformed values are
    /// rejected before any statement is built.
    pub fn validate(&self) -> Result<(), crate::error::CoreError> {
        use crate::error::CoreError;

        if self.is_empty() {
            return Err(CoreError::Validation(
                "patch contains no updatable fields".to_string(),
            ));
        }
        if let Some(origin) = &self.origin {
            if origin.trim().is_empty() {
                return Err(CoreError::Validation("origin must not be blank".to_string()));
            }
        }
        if let Some(destination) = &self.destination {
            if destination.trim().is_empty() {
                return Err(CoreError::Validation(
                    "destination must not be blank".to_string(),
                ));
            }
        }
        if let Some(seats) = self.seats {
            if seats < 1 {
                return Err(CoreError::Validation(
                    "seats must be at least 1".to_string(),
                ));
            }
        }
        if let Some(Some(price)) = self.price_per_seat {
            if price < 0 {
                return Err(CoreError::Validation(
                    "price per seat must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Scope of a mutation against a series member: the anchor occurrence only,
/// the anchor and everything after it, or the whole series including past
/// dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Affect only the selected occurrence
    Single,
    /// Anchor occurrence and all later ones (date comparison is inclusive
    /// of the anchor's own date)
    Future,
    /// Every member of the series, past dates included
    Series,
}

impl std::fmt::Display for EditScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditScope::Single => write!(f, "single"),
            EditScope::Future => write!(f, "future"),
            EditScope::Series => write!(f, "series"),
        }
    }
}

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "this" | "one" => Ok(EditScope::Single),
            "future" | "this_and_future" => Ok(EditScope::Future),
            "series" | "entire" | "all" => Ok(EditScope::Series),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0}")]
pub struct ParseEditScopeError(String);

/// Result of a scoped update: the rows after the change, in series order.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub updated_count: u64,
    pub rides: Vec<Ride>,
}

impl UpdateOutcome {
    pub fn message(&self) -> String {
        if self.updated_count == 1 {
            "Updated 1 ride".to_string()
        } else {
            format!("Updated {} rides", self.updated_count)
        }
    }
}

/// Result of a scoped delete: the ids actually removed, so callers can
/// reconcile cached state without a refetch.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub deleted_ids: Vec<Uuid>,
}

impl DeleteOutcome {
    pub fn message(&self) -> String {
        if self.deleted_ids.len() == 1 {
            "Deleted 1 ride".to_string()
        } else {
            format!("Deleted {} rides", self.deleted_ids.len())
        }
    }
}
