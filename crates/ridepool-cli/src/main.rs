use anyhow::anyhow;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use ridepool_core::db;
use ridepool_core::error::CoreError;
use ridepool_core::repository::SqliteRideStore;
use uuid::Uuid;

mod cli;
mod commands;
mod config;
mod parser;
mod scope_dialog;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let config = config::Config::new().unwrap_or_else(|_| config::Config::default());

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRideStore::new(db_pool);

    let cli = cli::Cli::parse();
    let requester = resolve_requester(cli.user.as_deref(), &config);

    let result = match cli.command {
        cli::Commands::Post(command) => match requester {
            Ok(user) => commands::post::post_ride(&repository, command, &config, user).await,
            Err(e) => Err(e),
        },
        cli::Commands::List(command) => {
            commands::list::list_rides(&repository, command, requester.ok()).await
        }
        cli::Commands::Edit(command) => match requester {
            Ok(user) => commands::edit::edit_ride(&repository, command, user).await,
            Err(e) => Err(e),
        },
        cli::Commands::Delete(command) => match requester {
            Ok(user) => commands::delete::delete_ride(&repository, command, user).await,
            Err(e) => Err(e),
        },
        cli::Commands::Cancel(command) => match requester {
            Ok(user) => commands::cancel::cancel_ride(&repository, command, user).await,
            Err(e) => Err(e),
        },
        cli::Commands::Series(command) => {
            commands::series::series_command(&repository, command).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

/// The requester identity comes from the outside: the --user flag or the
/// configured user. The core only compares it against a posting's owner.
fn resolve_requester(flag: Option<&str>, config: &config::Config) -> anyhow::Result<Uuid> {
    let raw = flag
        .or(config.user.as_deref())
        .ok_or_else(|| anyhow!("No user configured. Pass --user or set RIDEPOOL_USER."))?;
    raw.parse::<Uuid>()
        .map_err(|_| anyhow!("Invalid user id '{}': expected a UUID", raw))
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::Forbidden(s) => {
                eprintln!(
                    "{} You do not own this posting: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::Validation(s) => {
                eprintln!("{} Invalid patch: {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(rides) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, route) in rides {
                    eprintln!("  {} ({})", id.yellow(), route);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRepeatRule(s) => {
                eprintln!(
                    "{} Invalid repeat rule: {}",
                    "Error:".style(error_style),
                    s
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
