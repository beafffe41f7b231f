use anyhow::Result;
use ridepool_core::grouping::assemble_listing;
use ridepool_core::repository::Repository;
use uuid::Uuid;

use crate::cli::ListCommand;
use crate::views::table::display_listing;

pub async fn list_rides(
    repo: &impl Repository,
    command: ListCommand,
    requester: Option<Uuid>,
) -> Result<()> {
    let poster = if command.mine {
        Some(requester.ok_or_else(|| {
            anyhow::anyhow!("--mine requires a configured user; pass --user or set RIDEPOOL_USER")
        })?)
    } else {
        None
    };

    let rides = repo.list_rides(poster, command.all).await?;
    let listing = assemble_listing(&rides);

    if command.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    display_listing(&listing);
    Ok(())
}
