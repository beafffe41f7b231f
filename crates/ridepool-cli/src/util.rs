use anyhow::{anyhow, Result};
use ridepool_core::error::CoreError;
use ridepool_core::repository::Repository;
use uuid::Uuid;

pub async fn resolve_ride_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let rides = repo.find_rides_by_short_id_prefix(short_id).await?;
    if rides.len() == 1 {
        Ok(rides[0].id)
    } else if rides.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No ride found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let ride_info: Vec<(String, String)> = rides
            .into_iter()
            .map(|r| (r.id.to_string(), format!("{} → {}", r.origin, r.destination)))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(ride_info)))
    }
}
