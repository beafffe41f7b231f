use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use ridepool_core::models::EditScope;
use ridepool_core::repository::Repository;
use uuid::Uuid;

use crate::cli::DeleteCommand;
use crate::scope_dialog::{prompt_scope, DialogVariant, ScopeDialog};
use crate::util::resolve_ride_id;

pub async fn delete_ride(
    repo: &(impl Repository + Sync),
    command: DeleteCommand,
    requester: Uuid,
) -> Result<()> {
    let ride_id = resolve_ride_id(repo, &command.id).await?;
    let ride = match repo.find_ride_by_id(ride_id).await? {
        Some(ride) => ride,
        None => {
            println!("Nothing to delete.");
            return Ok(());
        }
    };

    let explicit = command
        .scope
        .as_deref()
        .map(|s| s.parse::<EditScope>())
        .transpose()?;

    let mut dialog = ScopeDialog::Closed;
    let scope = match explicit {
        Some(scope) => {
            if !command.yes && !confirm_delete(&ride.origin, &ride.destination) {
                println!("Deletion cancelled.");
                return Ok(());
            }
            scope
        }
        None if !ride.is_series_member() => {
            if !command.yes && !confirm_delete(&ride.origin, &ride.destination) {
                println!("Deletion cancelled.");
                return Ok(());
            }
            EditScope::Single
        }
        None => {
            let siblings = repo.series_siblings(&ride).await?;
            dialog = ScopeDialog::open(DialogVariant::Delete, ride.clone(), siblings);
            match prompt_scope(&mut dialog)? {
                Some((_, scope)) => scope,
                None => {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let result = repo.delete_scoped(ride_id, scope, requester).await;
    dialog.settle();
    let outcome = result?;

    println!("{}", outcome.message().green());
    for deleted_id in &outcome.deleted_ids {
        println!("  {} {}", "✗".red(), deleted_id);
    }

    Ok(())
}

fn confirm_delete(origin: &str, destination: &str) -> bool {
    Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete '{} → {}'?",
            origin, destination
        ))
        .default(false)
        .interact()
        .unwrap_or(false)
}
