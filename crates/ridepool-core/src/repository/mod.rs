use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{DeleteOutcome, EditScope, NewRideData, Ride, RidePatch, UpdateOutcome};
use async_trait::async_trait;
use uuid::Uuid;

// Re-export domain modules
pub mod rides;
pub mod series;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for ride posting operations
#[async_trait]
pub trait RideRepository {
    /// Creates the full batch for one posting: a single row, a round-trip
    /// pair, or a recurring series. Returns the created rows.
    async fn post_ride(&self, data: NewRideData) -> Result<Vec<Ride>, CoreError>;
    async fn find_ride_by_id(&self, id: Uuid) -> Result<Option<Ride>, CoreError>;
    async fn find_rides_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Ride>, CoreError>;
    async fn list_rides(
        &self,
        poster_id: Option<Uuid>,
        include_inactive: bool,
    ) -> Result<Vec<Ride>, CoreError>;
}

/// Domain-specific trait for scoped series mutations
#[async_trait]
pub trait SeriesRepository {
    /// All series members sharing the anchor's group id, anchor included,
    /// in `(departure_date, id)` order. A non-member anchor is its own
    /// series of one.
    async fn series_siblings(&self, anchor: &Ride) -> Result<Vec<Ride>, CoreError>;
    async fn update_scoped(
        &self,
        anchor_id: Uuid,
        scope: EditScope,
        patch: &RidePatch,
        requester_id: Uuid,
    ) -> Result<UpdateOutcome, CoreError>;
    async fn delete_scoped(
        &self,
        anchor_id: Uuid,
        scope: EditScope,
        requester_id: Uuid,
    ) -> Result<DeleteOutcome, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: RideRepository + SeriesRepository {
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern. The pool is passed in
/// explicitly; nothing here reaches for ambient state.
pub struct SqliteRideStore {
    pool: DbPool,
}

impl SqliteRideStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

// The main Repository trait implementation will automatically be available
// when all domain trait implementations are defined
impl Repository for SqliteRideStore {}
