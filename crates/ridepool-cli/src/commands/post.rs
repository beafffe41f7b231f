use anyhow::Result;
use ridepool_core::models::{NewRideData, PostingType};
use ridepool_core::repository::Repository;
use uuid::Uuid;

use crate::cli::{PostCommand, RepeatShortcut};
use crate::config::Config;
use crate::parser::{parse_departure_date, parse_departure_time};

pub async fn post_ride(
    repo: &impl Repository,
    command: PostCommand,
    config: &Config,
    requester: Uuid,
) -> Result<()> {
    let departure_date = parse_departure_date(&command.date)?;
    let departure_time = parse_departure_time(&command.time)?;
    let posting_type: PostingType = command.posting_type.parse()?;

    let mut data = NewRideData::new(
        requester,
        posting_type,
        &command.origin,
        &command.destination,
        departure_date,
        departure_time,
    );
    data.seats = command.seats.unwrap_or(config.default_seats);
    data.price_per_seat = command.price;
    data.notes = command.notes.clone();
    data.origin_lat = command.origin_lat;
    data.origin_lng = command.origin_lng;
    data.destination_lat = command.destination_lat;
    data.destination_lng = command.destination_lng;

    if let Some(return_date) = &command.return_date {
        data.return_date = Some(parse_departure_date(return_date)?);
        data.return_time = command
            .return_time
            .as_deref()
            .map(parse_departure_time)
            .transpose()?;
    }

    data.repeat_rule = if let Some(raw_rule) = command.repeat {
        // Use raw RRULE
        Some(raw_rule)
    } else if let Some(shortcut) = command.every {
        Some(build_repeat_rule(
            shortcut,
            command.count,
            command.until.as_deref(),
        )?)
    } else {
        None
    };

    let is_recurring = data.repeat_rule.is_some();
    let is_round_trip = data.return_date.is_some();
    let created = repo.post_ride(data).await?;
    let first = created
        .first()
        .ok_or_else(|| anyhow::anyhow!("posting created no rides"))?;

    // Success feedback with colors and helpful information
    use owo_colors::{OwoColorize, Style};
    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    if is_recurring {
        println!(
            "{} Posted recurring ride: {}",
            "✓".style(success_style),
            format!("{} → {}", first.origin, first.destination)
                .bright_white()
                .bold()
        );
        println!("  {} Ride ID: {}", "→".style(info_style), first.id);
        println!(
            "  {} {} occurrences created, {} through {}",
            "→".style(info_style),
            created.len(),
            first.departure_date,
            created
                .last()
                .map(|r| r.departure_date)
                .unwrap_or(first.departure_date)
        );
        println!(
            "\n{} Next steps:",
            "💡".style(subtle_style)
        );
        println!(
            "   {} View the series: ridepool series info {}",
            "•".style(subtle_style),
            &first.id.to_string()[..7]
        );
        println!(
            "   {} Edit one, future, or all: ridepool edit {} --scope single|future|series",
            "•".style(subtle_style),
            &first.id.to_string()[..7]
        );
    } else if is_round_trip {
        println!(
            "{} Posted round trip: {}",
            "✓".style(success_style),
            format!("{} ⇄ {}", first.origin, first.destination)
                .bright_white()
                .bold()
        );
        println!("  {} Ride ID: {}", "→".style(info_style), first.id);
        if let Some(return_leg) = created.last() {
            println!(
                "  {} Returns {} at {}",
                "→".style(info_style),
                return_leg.departure_date,
                return_leg.departure_time.format("%H:%M")
            );
        }
    } else {
        println!(
            "{} Posted ride: {}",
            "✓".style(success_style),
            format!("{} → {}", first.origin, first.destination)
                .bright_white()
                .bold()
        );
        println!("  {} Ride ID: {}", "→".style(info_style), first.id);
        println!(
            "  {} Departs: {} at {}",
            "→".style(info_style),
            first.departure_date,
            first.departure_time.format("%H:%M")
        );
    }

    Ok(())
}

/// Appends a COUNT or UNTIL bound to a frequency shortcut; the core
/// rejects unbounded rules.
fn build_repeat_rule(
    shortcut: RepeatShortcut,
    count: Option<u32>,
    until: Option<&str>,
) -> Result<String> {
    let pattern = shortcut.pattern();
    match until {
        Some(until) => {
            let last_date = parse_departure_date(until)?;
            Ok(format!(
                "{pattern};UNTIL={}",
                last_date.format("%Y%m%dT235959Z")
            ))
        }
        None => Ok(format!("{pattern};COUNT={}", count.unwrap_or(4))),
    }
}
