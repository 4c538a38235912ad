//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors raised while building a team summary (scan + resolve).
///
/// All of these are recovered per team: the failing team is omitted from the
/// run and the pipeline continues with the remaining teams.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("No event reference found in the last {window} messages of channel {channel}")]
    NoReferenceFound { channel: u64, window: usize },

    #[error("Event fetch failed with status {status}: {body}")]
    EventFetchFailed { status: u16, body: String },

    #[error("Event request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read channel history: {0}")]
    History(#[from] serenity::Error),
}

/// Errors raised while publishing a rendered artifact.
///
/// A publish failure skips that artifact for the run; the other artifact
/// still publishes.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Output channel {channel} is not resolvable")]
    SourceUnavailable { channel: u64 },

    #[error("Could not resolve or create the destination message in channel {channel}")]
    TargetUnresolvable { channel: u64 },

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Result type alias for roster operations.
pub type RosterResult<T> = std::result::Result<T, RosterError>;

/// Result type alias for publish operations.
pub type PublishResult<T> = std::result::Result<T, PublishError>;
