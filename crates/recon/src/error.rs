use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Parse(String),
    #[error("{name} must be between 0 and 100, got {value}")]
    OutOfRange { name: String, value: u8 },
    #[error("Questionable band is inverted: low={low}, high={high}")]
    InvertedBand { low: u8, high: u8 },
}

/// Failure reported by a record or directory collaborator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(pub Box<dyn std::error::Error + Send + Sync>);

impl SourceError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SourceError(err.into())
    }
}

/// Errors that abort a whole reconciliation run. Per-record conditions are
/// never raised; they are reported as [`crate::OutcomeReason`]s.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Directory source failed: {0}")]
    DirectorySnapshot(#[source] SourceError),
    #[error("Record source failed: {0}")]
    RecordSource(#[source] SourceError),
    #[error("Directory snapshot has no {0}")]
    EmptyDirectory(&'static str),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A loader failure for a single record. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Loader rejected contribution: {0}")]
    Rejected(String),
    #[error("Loader unavailable: {0}")]
    Unavailable(String),
}
