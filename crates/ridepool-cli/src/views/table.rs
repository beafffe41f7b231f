use chrono::{TimeZone, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use ridepool_core::grouping::RideListing;
use ridepool_core::models::{PostingType, RideStatus};

pub fn display_listing(entries: &[RideListing]) {
    if entries.is_empty() {
        println!("No rides found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Route", "Departure", "Return", "Type", "Seats", "Status",
    ]);

    for entry in entries {
        let ride = &entry.ride;
        let mut row = Row::new();
        row.add_cell(Cell::new(&ride.id.to_string()[..7]));

        // Build route with a series indicator
        let mut display_route = String::new();
        if ride.is_series_member() {
            display_route.push('↻'); // Recurring symbol
            display_route.push(' ');
        }
        display_route.push_str(&ride.origin);
        display_route.push_str(" → ");
        display_route.push_str(&ride.destination);

        let mut route_cell = Cell::new(display_route);
        match ride.status {
            RideStatus::Completed | RideStatus::Cancelled => {
                route_cell = route_cell
                    .add_attribute(Attribute::CrossedOut)
                    .fg(Color::DarkGrey);
            }
            RideStatus::Inactive => {
                route_cell = route_cell.fg(Color::DarkGrey);
            }
            RideStatus::Active => {
                route_cell = match ride.posting_type {
                    PostingType::Driver => route_cell.fg(Color::Cyan),
                    PostingType::Passenger => route_cell.fg(Color::Magenta),
                    PostingType::Flexible => route_cell,
                };
            }
        };
        row.add_cell(route_cell);

        let departure_dt =
            Utc.from_utc_datetime(&ride.departure_date.and_time(ride.departure_time));
        let now = Utc::now();
        let departure_text = format!(
            "{} {} ({})",
            ride.departure_date,
            ride.departure_time.format("%H:%M"),
            departure_dt.humanize()
        );
        let departure_cell = if ride.status == RideStatus::Active && departure_dt < now {
            Cell::new(departure_text).fg(Color::Red) // Departed
        } else if ride.departure_date == now.date_naive() {
            Cell::new(departure_text).fg(Color::Yellow) // Today
        } else {
            Cell::new(departure_text)
        };
        row.add_cell(departure_cell);

        row.add_cell(Cell::new(match (entry.return_date, entry.return_time) {
            (Some(date), Some(time)) => format!("{} {}", date, time.format("%H:%M")),
            (Some(date), None) => date.to_string(),
            _ => "None".to_string(),
        }));

        row.add_cell(Cell::new(ride.posting_type.to_string()));
        row.add_cell(Cell::new(ride.seats.to_string()));

        let mut status_cell = Cell::new(ride.status.to_string());
        status_cell = match ride.status {
            RideStatus::Active => status_cell.fg(Color::Green),
            RideStatus::Cancelled => status_cell.fg(Color::DarkGrey),
            RideStatus::Inactive | RideStatus::Completed => status_cell,
        };
        row.add_cell(status_cell);

        table.add_row(row);
    }

    println!("{table}");
}
