use clap::{Parser, Subcommand, ValueEnum};

/// A carpool marketplace CLI with recurring ride series and round trips
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Act as this user (UUID); defaults to the configured user
    #[clap(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Post a new ride
    Post(PostCommand),
    /// List ride postings
    List(ListCommand),
    /// Edit a ride posting
    Edit(EditCommand),
    /// Delete a ride posting
    Delete(DeleteCommand),
    /// Cancel a ride posting (keeps the row, flips its status)
    Cancel(CancelCommand),
    /// Inspect a recurring ride series
    Series(SeriesCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct PostCommand {
    /// Start location
    pub origin: String,
    /// End location
    pub destination: String,

    /// Departure date (e.g., '2025-02-01', 'next saturday')
    #[clap(long)]
    pub date: String,
    /// Departure time of day (e.g., '7:30', '4:00 PM')
    #[clap(long, default_value = "08:00")]
    pub time: String,
    /// Posting type (driver|passenger|flexible)
    #[clap(long = "type", default_value = "driver")]
    pub posting_type: String,
    /// Seats offered (driver) or needed (passenger)
    #[clap(long)]
    pub seats: Option<i64>,
    /// Price per seat in cents
    #[clap(long)]
    pub price: Option<i64>,
    #[clap(long)]
    pub notes: Option<String>,

    /// Return date; creates a round trip with a linked return leg
    #[clap(long, conflicts_with_all = ["repeat", "every"])]
    pub return_date: Option<String>,
    /// Return time of day (defaults to the departure time)
    #[clap(long, requires = "return_date")]
    pub return_time: Option<String>,

    /// Raw RFC 5545 repeat rule for a recurring series (must be bounded)
    #[clap(long, conflicts_with = "every", help = "Raw RFC 5545 recurrence rule")]
    pub repeat: Option<String>,
    /// Human-friendly repeat frequency
    #[clap(long, value_enum, help = "Human-friendly frequency (daily, weekly, ...)")]
    pub every: Option<RepeatShortcut>,
    /// Number of occurrences for --every
    #[clap(long, requires = "every")]
    pub count: Option<u32>,
    /// Last date for --every (e.g., '2025-12-31')
    #[clap(long, requires = "every", conflicts_with = "count")]
    pub until: Option<String>,

    /// Start coordinates
    #[clap(long)]
    pub origin_lat: Option<f64>,
    #[clap(long)]
    pub origin_lng: Option<f64>,
    /// End coordinates
    #[clap(long)]
    pub destination_lat: Option<f64>,
    #[clap(long)]
    pub destination_lng: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only my own postings
    #[clap(long)]
    pub mine: bool,
    /// Include inactive, completed, and cancelled postings
    #[clap(long)]
    pub all: bool,
    /// Machine-readable JSON output
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the ride to edit (short id prefix accepted)
    pub id: String,

    /// Force scope without interactive prompting (for scripting)
    #[arg(long, help = "Force scope without interactive prompting")]
    pub force_scope: bool,
    /// How to apply changes (single|future|series)
    #[arg(long, help = "How to apply changes to a recurring series")]
    pub scope: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    /// New departure date
    #[arg(long)]
    pub date: Option<String>,
    /// New departure time
    #[arg(long)]
    pub time: Option<String>,
    /// Posting type (driver|passenger|flexible)
    #[arg(long = "type")]
    pub posting_type: Option<String>,
    #[arg(long)]
    pub seats: Option<i64>,

    #[arg(long)]
    pub price: Option<i64>,
    #[arg(long, conflicts_with = "price")]
    pub price_clear: bool,

    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, conflicts_with = "notes")]
    pub notes_clear: bool,

    /// Status (active|inactive|completed|cancelled)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the ride to delete (short id prefix accepted)
    pub id: String,
    /// How much of the series to delete (single|future|series)
    #[clap(long)]
    pub scope: Option<String>,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CancelCommand {
    /// The ID of the ride to cancel (short id prefix accepted)
    pub id: String,
    /// How much of the series to cancel (single|future|series)
    #[clap(long)]
    pub scope: Option<String>,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SeriesCommand {
    #[command(subcommand)]
    pub command: SeriesSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SeriesSubcommand {
    /// Show series members, per-scope counts, and the next occurrence
    Info(SeriesInfoCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct SeriesInfoCommand {
    /// Any member's ID (short id prefix accepted)
    pub id: String,
}

/// Human-friendly repeat patterns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatShortcut {
    /// Every day
    Daily,
    /// Every week (same day)
    Weekly,
    /// Every month (same date)
    Monthly,
    /// Monday to Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
}

impl std::fmt::Display for RepeatShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepeatShortcut::Daily => write!(f, "daily"),
            RepeatShortcut::Weekly => write!(f, "weekly"),
            RepeatShortcut::Monthly => write!(f, "monthly"),
            RepeatShortcut::Weekdays => write!(f, "weekdays"),
            RepeatShortcut::Weekends => write!(f, "weekends"),
        }
    }
}

impl RepeatShortcut {
    /// The bare frequency pattern; bounds (COUNT/UNTIL) are appended by the
    /// post command
    pub fn pattern(&self) -> &'static str {
        match self {
            RepeatShortcut::Daily => "FREQ=DAILY",
            RepeatShortcut::Weekly => "FREQ=WEEKLY",
            RepeatShortcut::Monthly => "FREQ=MONTHLY",
            RepeatShortcut::Weekdays => "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR",
            RepeatShortcut::Weekends => "FREQ=WEEKLY;BYDAY=SA,SU",
        }
    }
}
