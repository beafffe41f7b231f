use crate::error::CoreError;
use crate::models::{NewRideData, Ride, RideStatus, TripDirection};
use crate::repository::SqliteRideStore;
use crate::schedule;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::RideRepository for SqliteRideStore {
    async fn post_ride(&self, data: NewRideData) -> Result<Vec<Ride>, CoreError> {
        validate_new_ride(&data)?;

        let mut tx = self.pool().begin().await?;

        let created = if let Some(rule) = &data.repeat_rule {
            // Recurring series: one row per expanded date, all sharing a
            // fresh group id with is_recurring set
            let dates =
                schedule::expand_repeat_dates(rule, data.departure_date, data.departure_time)?;
            let group_id = Uuid::now_v7();

            let mut rows = Vec::with_capacity(dates.len());
            for date in dates {
                let ride = occurrence_row(
                    &data,
                    date,
                    data.departure_time,
                    Some(group_id),
                    true,
                    TripDirection::None,
                );
                Self::insert_ride_in_transaction(&mut tx, &ride).await?;
                rows.push(ride);
            }
            rows
        } else if let Some(return_date) = data.return_date {
            // Round trip: departure leg plus a return leg with the
            // endpoints swapped, linked by a fresh group id
            let group_id = Uuid::now_v7();
            let return_time = data.return_time.unwrap_or(data.departure_time);

            let departure = occurrence_row(
                &data,
                data.departure_date,
                data.departure_time,
                Some(group_id),
                false,
                TripDirection::Departure,
            );
            let mut return_leg = occurrence_row(
                &data,
                return_date,
                return_time,
                Some(group_id),
                false,
                TripDirection::Return,
            );
            return_leg.origin = data.destination.clone();
            return_leg.destination = data.origin.clone();
            return_leg.origin_lat = data.destination_lat;
            return_leg.origin_lng = data.destination_lng;
            return_leg.destination_lat = data.origin_lat;
            return_leg.destination_lng = data.origin_lng;

            Self::insert_ride_in_transaction(&mut tx, &departure).await?;
            Self::insert_ride_in_transaction(&mut tx, &return_leg).await?;
            vec![departure, return_leg]
        } else {
            let ride = occurrence_row(
                &data,
                data.departure_date,
                data.departure_time,
                None,
                false,
                TripDirection::None,
            );
            Self::insert_ride_in_transaction(&mut tx, &ride).await?;
            vec![ride]
        };

        tx.commit().await?;
        Ok(created)
    }

    async fn find_ride_by_id(&self, id: Uuid) -> Result<Option<Ride>, CoreError> {
        let ride = sqlx::query_as("SELECT * FROM rides WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(ride)
    }

    async fn find_rides_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Ride>, CoreError> {
        // Ids are stored as 16-byte blobs; match the displayed hex prefix
        // against hex(id), ignoring hyphens
        let needle = short_id.replace('-', "").to_lowercase();
        let mut pattern = String::with_capacity(needle.len() + 1);
        pattern.push_str(&needle);
        pattern.push('%');

        let rides: Vec<Ride> = sqlx::query_as("SELECT * FROM rides WHERE lower(hex(id)) LIKE ?")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(rides)
    }

    async fn list_rides(
        &self,
        poster_id: Option<Uuid>,
        include_inactive: bool,
    ) -> Result<Vec<Ride>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM rides");

        let mut has_where = false;
        if !include_inactive {
            qb.push(" WHERE status = ");
            qb.push_bind(RideStatus::Active);
            has_where = true;
        }
        if let Some(poster) = poster_id {
            qb.push(if has_where { " AND " } else { " WHERE " });
            qb.push("poster_id = ");
            qb.push_bind(poster);
        }
        qb.push(" ORDER BY departure_date, departure_time");

        let rides = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rides)
    }
}

impl SqliteRideStore {
    /// Insert one occurrence row within an existing transaction
    pub(crate) async fn insert_ride_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        ride: &Ride,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO rides (
                id, poster_id, posting_type, origin, destination,
                origin_lat, origin_lng, destination_lat, destination_lng,
                departure_date, departure_time, is_round_trip, trip_direction,
                round_trip_group_id, is_recurring, status, seats,
                price_per_seat, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(ride.id)
        .bind(ride.poster_id)
        .bind(ride.posting_type)
        .bind(&ride.origin)
        .bind(&ride.destination)
        .bind(ride.origin_lat)
        .bind(ride.origin_lng)
        .bind(ride.destination_lat)
        .bind(ride.destination_lng)
        .bind(ride.departure_date)
        .bind(ride.departure_time)
        .bind(ride.is_round_trip)
        .bind(ride.trip_direction)
        .bind(ride.round_trip_group_id)
        .bind(ride.is_recurring)
        .bind(ride.status)
        .bind(ride.seats)
        .bind(ride.price_per_seat)
        .bind(&ride.notes)
        .bind(ride.created_at)
        .bind(ride.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

fn validate_new_ride(data: &NewRideData) -> Result<(), CoreError> {
    if data.origin.trim().is_empty() || data.destination.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "origin and destination must not be blank".to_string(),
        ));
    }
    if data.seats < 1 {
        return Err(CoreError::InvalidInput(
            "seats must be at least 1".to_string(),
        ));
    }
    if let Some(price) = data.price_per_seat {
        if price < 0 {
            return Err(CoreError::InvalidInput(
                "price per seat must not be negative".to_string(),
            ));
        }
    }
    if data.repeat_rule.is_some() && data.return_date.is_some() {
        return Err(CoreError::InvalidInput(
            "a posting cannot combine a repeat rule with a return leg".to_string(),
        ));
    }
    if let Some(return_date) = data.return_date {
        if return_date < data.departure_date {
            return Err(CoreError::InvalidInput(
                "return date must not be before the departure date".to_string(),
            ));
        }
    }
    Ok(())
}

fn occurrence_row(
    data: &NewRideData,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    round_trip_group_id: Option<Uuid>,
    is_recurring: bool,
    trip_direction: TripDirection,
) -> Ride {
    let now = Utc::now();
    Ride {
        id: Uuid::now_v7(),
        poster_id: data.poster_id,
        posting_type: data.posting_type,
        origin: data.origin.clone(),
        destination: data.destination.clone(),
        origin_lat: data.origin_lat,
        origin_lng: data.origin_lng,
        destination_lat: data.destination_lat,
        destination_lng: data.destination_lng,
        departure_date,
        departure_time,
        is_round_trip: trip_direction != TripDirection::None,
        trip_direction,
        round_trip_group_id,
        is_recurring,
        status: RideStatus::Active,
        seats: data.seats,
        price_per_seat: data.price_per_seat,
        notes: data.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}
