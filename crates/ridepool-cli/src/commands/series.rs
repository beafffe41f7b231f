use anyhow::Result;
use chrono::{TimeZone, Utc};
use chrono_humanize::Humanize;
use comfy_table::Table;
use owo_colors::OwoColorize;
use ridepool_core::grouping::series_groups;
use ridepool_core::repository::Repository;
use ridepool_core::scope::ScopeOptions;

use crate::cli::{SeriesCommand, SeriesInfoCommand, SeriesSubcommand};
use crate::util::resolve_ride_id;

pub async fn series_command(
    repo: &(impl Repository + Sync),
    command: SeriesCommand,
) -> Result<()> {
    match command.command {
        SeriesSubcommand::Info(cmd) => info_command(repo, cmd).await,
    }
}

async fn info_command(repo: &(impl Repository + Sync), command: SeriesInfoCommand) -> Result<()> {
    let ride_id = resolve_ride_id(repo, &command.id).await?;
    let ride = repo
        .find_ride_by_id(ride_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Ride not found"))?;

    if !ride.is_series_member() {
        return Err(anyhow::anyhow!(
            "This ride is not part of a recurring series"
        ));
    }

    let siblings = repo.series_siblings(&ride).await?;
    let groups = series_groups(&siblings);
    let group = groups
        .first()
        .ok_or_else(|| anyhow::anyhow!("No recurring series found for this ride"))?;

    println!("{}", "Series Information".blue().bold());
    println!("Series ID: {}", group.group_id.to_string().yellow());
    println!("Route: {}", group.title.cyan());
    println!("Occurrences: {}", group.rides.len());

    // What a mutation anchored here would touch
    let options = ScopeOptions::compute(&ride, &siblings);
    println!();
    println!("{}", "Mutation scopes from this occurrence".blue().bold());
    println!("  single: 1 ride");
    match options.future {
        Some(count) => println!("  future: {count} rides"),
        None => println!("  future: {}", "not available (last occurrence)".bright_black()),
    }
    println!("  series: {} rides", options.series);

    println!();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Time", "Status", ""]);
    for member in &group.rides {
        let marker = if member.id == ride.id { "← anchor" } else { "" };
        table.add_row(vec![
            member.id.to_string()[..7].to_string(),
            member.departure_date.to_string(),
            member.departure_time.format("%H:%M").to_string(),
            member.status.to_string(),
            marker.to_string(),
        ]);
    }
    println!("{table}");

    // Next upcoming occurrence, if any
    let today = Utc::now().date_naive();
    if let Some(next) = group
        .rides
        .iter()
        .find(|member| member.departure_date >= today)
    {
        let next_dt = Utc.from_utc_datetime(&next.departure_date.and_time(next.departure_time));
        println!(
            "Next occurrence: {} ({})",
            next.departure_date,
            next_dt.humanize()
        );
    } else {
        println!("No upcoming occurrences (series is in the past)");
    }

    Ok(())
}
