use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Requester identity (UUID) used when --user is not passed. The core
    /// only ever compares it against a posting's owner.
    #[serde(default)]
    pub user: Option<String>,
    /// Seats used by `post` when --seats is not given
    #[serde(default = "default_seats")]
    pub default_seats: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user: None,
            default_seats: default_seats(),
        }
    }
}

fn default_database_path() -> String {
    "ridepool.db".to_string()
}

fn default_seats() -> i64 {
    1
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("ridepool.toml"))
            .merge(Env::prefixed("RIDEPOOL_"))
            .extract()
    }
}
