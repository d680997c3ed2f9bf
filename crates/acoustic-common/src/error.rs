use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("migration {version} ({name}) failed: {message}")]
    Migration {
        version: String,
        name: String,
        message: String,
    },

    #[error("migration file not found for version {0}")]
    MigrationNotFound(String),

    #[error("invalid migration file {path}: {message}")]
    InvalidMigration { path: String, message: String },

    #[error("checksum mismatch for migration {version}: recorded {expected}, computed {actual}")]
    ChecksumMismatch {
        version: String,
        expected: String,
        actual: String,
    },

    #[error("migration {0} is already applied")]
    AlreadyApplied(String),

    #[error("migration {0} is not applied")]
    NotApplied(String),

    #[error("seed error: {0}")]
    Seed(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Version of the migration this error originated from, if any.
    pub fn migration_version(&self) -> Option<&str> {
        match self {
            Error::Migration { version, .. }
            | Error::ChecksumMismatch { version, .. }
            | Error::MigrationNotFound(version)
            | Error::AlreadyApplied(version)
            | Error::NotApplied(version) => Some(version),
            _ => None,
        }
    }
}
