//! # Ridepool Core Library
//!
//! The core of a carpool-matching marketplace: dated ride postings that can
//! belong to a recurring series or a round-trip pair, with owner mutations
//! applied at occurrence, future, or whole-series scope.
//!
//! ## Features
//!
//! - **Series-Based Postings**: a recurring itinerary is stored as one row
//!   per dated occurrence, all sharing a group id
//! - **Round-Trip Pairing**: a departure and a return leg share a group id
//!   and are merged for display only, never collapsed in storage
//! - **Scoped Bulk Mutations**: edit or delete a single occurrence, all
//!   future occurrences, or the entire series as exactly one filtered bulk
//!   statement, so readers never observe a half-applied change
//! - **Ownership Enforcement**: every mutation checks the requester against
//!   the posting owner before any write
//! - **Type Safety**: typed row projections and an allow-listed patch
//!   structure validated at the boundary
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`grouping`]: Display grouping and round-trip merge engine
//! - [`scope`]: Scope resolution for series mutations
//! - [`schedule`]: Repeat-rule expansion for batch posting
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::{NaiveDate, NaiveTime};
//! use uuid::Uuid;
//! use ridepool_core::{
//!     db,
//!     models::{NewRideData, PostingType},
//!     repository::{RideRepository, SqliteRideStore},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Initialize database
//!     let pool = db::establish_connection("rides.db").await?;
//!     let store = SqliteRideStore::new(pool);
//!
//!     // Post a weekly commute as a recurring series
//!     let mut data = NewRideData::new(
//!         Uuid::now_v7(),
//!         PostingType::Driver,
//!         "San Francisco",
//!         "South Lake Tahoe",
//!         NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
//!         NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
//!     );
//!     data.repeat_rule = Some("FREQ=WEEKLY;COUNT=8".to_string());
//!
//!     let rides = store.post_ride(data).await?;
//!     println!("Posted {} occurrences", rides.len());
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod grouping;
pub mod models;
pub mod repository;
pub mod schedule;
pub mod scope;
