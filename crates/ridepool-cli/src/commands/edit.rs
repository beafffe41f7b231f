use anyhow::Result;
use owo_colors::OwoColorize;
use ridepool_core::models::{EditScope, PostingType, RidePatch, RideStatus};
use ridepool_core::repository::Repository;
use uuid::Uuid;

use crate::cli::EditCommand;
use crate::parser::{parse_departure_date, parse_departure_time};
use crate::scope_dialog::{prompt_scope, DialogVariant, ScopeDialog};
use crate::util::resolve_ride_id;

pub async fn edit_ride(
    repo: &(impl Repository + Sync),
    command: EditCommand,
    requester: Uuid,
) -> Result<()> {
    let ride_id = resolve_ride_id(repo, &command.id).await?;
    let ride = repo
        .find_ride_by_id(ride_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Ride not found"))?;

    let patch = build_patch(&command)?;

    // Explicit scope, forced default, or interactive selection for series
    let explicit = match &command.scope {
        Some(scope_str) => Some(scope_str.parse::<EditScope>()?),
        None if !ride.is_series_member() => Some(EditScope::Single),
        None if command.force_scope => Some(EditScope::Single),
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
                    println!("Edit cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let result = repo.update_scoped(ride_id, scope, &patch, requester).await;
    dialog.settle();
    let outcome = result?;

    match scope {
        EditScope::Single => println!(
            "{} (ride ID: {})",
            outcome.message().green(),
            &ride_id.to_string()[..7]
        ),
        EditScope::Future => println!(
            "{} (this and future occurrences)",
            outcome.message().green()
        ),
        EditScope::Series => println!("{} (entire series)", outcome.message().green()),
    }

    Ok(())
}

fn build_patch(command: &EditCommand) -> Result<RidePatch> {
    let price_per_seat = if command.price_clear {
        Some(None)
    } else {
        command.price.map(Some)
    };

    let notes = if command.notes_clear {
        Some(None)
    } else {
        command.notes.clone().map(Some)
    };

    Ok(RidePatch {
        posting_type: command
            .posting_type
            .as_deref()
            .map(|s| s.parse::<PostingType>())
            .transpose()?,
        origin: command.origin.clone(),
        destination: command.destination.clone(),
        origin_lat: None,
        origin_lng: None,
        destination_lat: None,
        destination_lng: None,
        departure_date: command
            .date
            .as_deref()
            .map(parse_departure_date)
            .transpose()?,
        departure_time: command
            .time
            .as_deref()
            .map(parse_departure_time)
            .transpose()?,
        seats: command.seats,
        price_per_seat,
        notes,
        status: command
            .status
            .as_deref()
            .map(|s| s.parse::<RideStatus>())
            .transpose()?,
    })
}
