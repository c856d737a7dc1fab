//! `almoner-recon`: matches uploaded contribution records to directory
//! people and funds.
//!
//! Pure engine crate: receives a pre-loaded batch and directory snapshot,
//! returns partitioned results. No file or network IO.

pub mod ambiguity;
pub mod config;
pub mod engine;
pub mod error;
pub mod fund_match;
pub mod loader;
pub mod model;
pub mod name_match;
pub mod similarity;
pub mod source;

pub use config::MatchConfig;
pub use engine::{reconcile, reconcile_snapshot, reconcile_sources};
pub use error::{ConfigError, LoadError, ReconError, SourceError};
pub use loader::{load_all, BatchInfo, ContributionLoader, ContributionPayload, LoadReport};
pub use model::{
    AutoLoadable, Candidate, HeldRecord, MatchKind, MatchOutcome, MatchStatus, OutcomeReason,
    ReconSummary, ReconciliationResult,
};
pub use source::{DirectorySource, RecordSource};
