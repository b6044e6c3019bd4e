use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Kiosk {kiosk_id}: failed writing {path}: {source}")]
    LedgerWrite {
        kiosk_id: String,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Kiosk {kiosk_id}: registry file {path} not found")]
    MissingRegistry { kiosk_id: String, path: PathBuf },

    #[error("Kiosk {kiosk_id}: malformed registry file {path}: {reason}")]
    MalformedRegistry {
        kiosk_id: String,
        path: PathBuf,
        reason: String,
    },

    #[error("No kiosk_* directories found in {location}")]
    NoKiosks { location: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the batch may skip the affected kiosk and carry on.
    /// Only a missing registry qualifies; everything else stops the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingRegistry { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
