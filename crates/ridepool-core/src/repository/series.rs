use crate::error::CoreError;
use crate::models::{DeleteOutcome, EditScope, Ride, RidePatch, UpdateOutcome};
use crate::repository::SqliteRideStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[async_trait]
impl super::SeriesRepository for SqliteRideStore {
    async fn series_siblings(&self, anchor: &Ride) -> Result<Vec<Ride>, CoreError> {
        let group_id = match anchor.series_group() {
            Some(group_id) => group_id,
            // Not a series member: a series of one
            None => return Ok(vec![anchor.clone()]),
        };

        let mut rides: Vec<Ride> = sqlx::query_as(
            "SELECT * FROM rides WHERE round_trip_group_id = $1 AND is_recurring = 1",
        )
        .bind(group_id)
        .fetch_all(self.pool())
        .await?;
        rides.sort_by_key(Ride::series_key);
        Ok(rides)
    }

    async fn update_scoped(
        &self,
        anchor_id: Uuid,
        scope: EditScope,
        patch: &RidePatch,
        requester_id: Uuid,
    ) -> Result<UpdateOutcome, CoreError> {
        patch.validate()?;

        let anchor: Ride = sqlx::query_as("SELECT * FROM rides WHERE id = $1")
            .bind(anchor_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(anchor_id.to_string()))?;

        if anchor.poster_id != requester_id {
            return Err(CoreError::Forbidden(anchor_id.to_string()));
        }

        // Exactly one filtered bulk statement: the predicate defines the
        // target set at execution time, so concurrent readers see the
        // series before or after the change, never in between.
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE rides SET ");
        push_patch_fields(&mut qb, patch);
        qb.push("updated_at = ");
        qb.push_bind(Utc::now());
        push_scope_filter(&mut qb, &anchor, scope);
        qb.push(" RETURNING *");

        let mut rides: Vec<Ride> = qb.build_query_as().fetch_all(self.pool()).await?;
        rides.sort_by_key(Ride::series_key);

        Ok(UpdateOutcome {
            updated_count: rides.len() as u64,
            rides,
        })
    }

    async fn delete_scoped(
        &self,
        anchor_id: Uuid,
        scope: EditScope,
        requester_id: Uuid,
    ) -> Result<DeleteOutcome, CoreError> {
        let anchor: Option<Ride> = sqlx::query_as("SELECT * FROM rides WHERE id = $1")
            .bind(anchor_id)
            .fetch_optional(self.pool())
            .await?;

        let anchor = match anchor {
            Some(anchor) => anchor,
            // An absent anchor is indistinguishable from a series another
            // caller already deleted; report the empty outcome
            None => {
                return Ok(DeleteOutcome {
                    deleted_ids: Vec::new(),
                })
            }
        };

        if anchor.poster_id != requester_id {
            return Err(CoreError::Forbidden(anchor_id.to_string()));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM rides");
        push_scope_filter(&mut qb, &anchor, scope);
        qb.push(" RETURNING id");

        let mut deleted_ids: Vec<Uuid> = qb.build_query_scalar().fetch_all(self.pool()).await?;
        deleted_ids.sort();

        Ok(DeleteOutcome { deleted_ids })
    }
}

/// SET clauses for every field present in the patch, each followed by a
/// separator; the caller appends `updated_at` last.
fn push_patch_fields(qb: &mut QueryBuilder<'_, Sqlite>, patch: &RidePatch) {
    if let Some(posting_type) = patch.posting_type {
        qb.push("posting_type = ");
        qb.push_bind(posting_type);
        qb.push(", ");
    }
    if let Some(origin) = &patch.origin {
        qb.push("origin = ");
        qb.push_bind(origin.clone());
        qb.push(", ");
    }
    if let Some(destination) = &patch.destination {
        qb.push("destination = ");
        qb.push_bind(destination.clone());
        qb.push(", ");
    }
    if let Some(origin_lat) = patch.origin_lat {
        qb.push("origin_lat = ");
        qb.push_bind(origin_lat);
        qb.push(", ");
    }
    if let Some(origin_lng) = patch.origin_lng {
        qb.push("origin_lng = ");
        qb.push_bind(origin_lng);
        qb.push(", ");
    }
    if let Some(destination_lat) = patch.destination_lat {
        qb.push("destination_lat = ");
        qb.push_bind(destination_lat);
        qb.push(", ");
    }
    if let Some(destination_lng) = patch.destination_lng {
        qb.push("destination_lng = ");
        qb.push_bind(destination_lng);
        qb.push(", ");
    }
    if let Some(departure_date) = patch.departure_date {
        qb.push("departure_date = ");
        qb.push_bind(departure_date);
        qb.push(", ");
    }
    if let Some(departure_time) = patch.departure_time {
        qb.push("departure_time = ");
        qb.push_bind(departure_time);
        qb.push(", ");
    }
    if let Some(seats) = patch.seats {
        qb.push("seats = ");
        qb.push_bind(seats);
        qb.push(", ");
    }
    if let Some(price_per_seat) = patch.price_per_seat {
        qb.push("price_per_seat = ");
        qb.push_bind(price_per_seat);
        qb.push(", ");
    }
    if let Some(notes) = &patch.notes {
        qb.push("notes = ");
        qb.push_bind(notes.clone());
        qb.push(", ");
    }
    if let Some(status) = patch.status {
        qb.push("status = ");
        qb.push_bind(status);
        qb.push(", ");
    }
}

/// WHERE clause for the requested scope. `single` filters by the anchor id
/// alone; `future` and `series` filter by the series group, with `future`
/// additionally bounded by the anchor's date (inclusive). A non-series
/// anchor collapses any scope to the anchor row.
fn push_scope_filter(qb: &mut QueryBuilder<'_, Sqlite>, anchor: &Ride, scope: EditScope) {
    match (anchor.series_group(), scope) {
        (Some(group_id), EditScope::Future) => {
            qb.push(" WHERE round_trip_group_id = ");
            qb.push_bind(group_id);
            qb.push(" AND is_recurring = 1 AND departure_date >= ");
            qb.push_bind(anchor.departure_date);
        }
        (Some(group_id), EditScope::Series) => {
            qb.push(" WHERE round_trip_group_id = ");
            qb.push_bind(group_id);
            qb.push(" AND is_recurring = 1");
        }
        _ => {
            qb.push(" WHERE id = ");
            qb.push_bind(anchor.id);
        }
    }
}
