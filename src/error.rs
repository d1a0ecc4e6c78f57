use std::path::PathBuf;

use thiserror::Error;

use crate::server::indicator::IndicatorKey;
use crate::server::player::PlayerId;

/// Problems found while loading the config file. None of these are fatal:
/// the affected value(s) fall back to their defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write default config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{key}`: {reason}. Using default")]
    InvalidValue { key: String, reason: String },
}

/// Why an incoming skill event did not touch any indicator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    #[error("indicators are disabled")]
    FeatureDisabled,

    /// Expected when the player left before the event was delivered.
    #[error("event is missing its {0} context")]
    MissingContext(&'static str),

    #[error("unknown skill `{0}`")]
    UnknownSkill(String),

    #[error("player {0} has no indicator")]
    NoIndicator(PlayerId),
}

/// Failure reported by the host while rendering an indicator or effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("indicator {0:?} is no longer attached")]
    Detached(IndicatorKey),

    #[error("player {0} is not online")]
    PlayerOffline(PlayerId),
}

/// A console line that could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
}
