use anyhow::Result;
use owo_colors::OwoColorize;
use ridepool_core::models::{EditScope, RidePatch, RideStatus};
use ridepool_core::repository::Repository;
use uuid::Uuid;

use crate::cli::CancelCommand;
use crate::scope_dialog::{prompt_scope, DialogVariant, ScopeDialog};
use crate::util::resolve_ride_id;

/// Cancelling keeps the rows but flips their status, through the same
/// scoped update path as any other edit.
pub async fn cancel_ride(
    repo: &(impl Repository + Sync),
    command: CancelCommand,
    requester: Uuid,
) -> Result<()> {
    let ride_id = resolve_ride_id(repo, &command.id).await?;
    let ride = repo
        .find_ride_by_id(ride_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Ride not found"))?;

    let explicit = match &command.scope {
        Some(scope_str) => Some(scope_str.parse::<EditScope>()?),
        None if !ride.is_series_member() => Some(EditScope::Single),
        None if command.yes => Some(EditScope::Single),
        None => None,
    };

    let mut dialog = ScopeDialog::Closed;
    let scope = match explicit {
        Some(scope) => scope,
        None => {
            let siblings = repo.series_siblings(&ride).await?;
            dialog = ScopeDialog::open(DialogVariant::Edit, ride.clone(), siblings);
            match prompt_scope(&mut dialog)? {
                Some((_, scope)) => scope,
                None => {
                    println!("Cancellation aborted.");
                    return Ok(());
                }
            }
        }
    };

    let patch = RidePatch {
        status: Some(RideStatus::Cancelled),
        ..Default::default()
    };

    let result = repo.update_scoped(ride_id, scope, &patch, requester).await;
    dialog.settle();
    let outcome = result?;

    println!(
        "{} Cancelled {} ride(s)",
        "✓".green(),
        outcome.updated_count
    );

    Ok(())
}
