use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Ride not found: {0}")]
    NotFound(String),

    #[error("Not the owner of this posting: {0}")]
    Forbidden(String),

    #[error("Invalid patch: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid repeat rule: {0}")]
    InvalidRepeatRule(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Route)

    #[error("An unknown error has occurred.")]
    Unknown,
}
