use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

/// Position of a record within its uploaded batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Contributor name is empty")]
    EmptyContributor,
}

/// One uploaded contribution row. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub date: NaiveDate,
    pub contributor_name: String,
    pub first_name: String,
    pub last_name: String,
    pub amount: Money,
    pub fund_name: String,
    pub method: String,
}

impl ContributionRecord {
    /// Builds a record, deriving first/last name from the first two
    /// whitespace-separated tokens of `contributor_name`.
    pub fn new(
        date: NaiveDate,
        contributor_name: &str,
        amount: Money,
        fund_name: &str,
        method: &str,
    ) -> Result<Self, RecordError> {
        let (first_name, last_name) = split_name(contributor_name)?;
        Ok(ContributionRecord {
            date,
            contributor_name: contributor_name.to_string(),
            first_name,
            last_name,
            amount,
            fund_name: fund_name.to_string(),
            method: method.to_string(),
        })
    }

    pub fn has_full_name(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty()
    }
}

fn split_name(contributor_name: &str) -> Result<(String, String), RecordError> {
    let mut tokens = contributor_name.split_whitespace();
    let first = tokens.next().ok_or(RecordError::EmptyContributor)?;
    let last = tokens.next().unwrap_or_default();
    Ok((first.to_string(), last.to_string()))
}
