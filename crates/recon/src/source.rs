use almoner_core::{ContributionRecord, DirectoryFund, DirectoryPerson, DirectorySnapshot};

use crate::error::SourceError;

/// Supplies the uploaded rows, already split into first and last name.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<ContributionRecord>, SourceError>;
}

/// Supplies the known people and funds as of request time.
pub trait DirectorySource {
    fn people(&self) -> Result<Vec<DirectoryPerson>, SourceError>;
    fn funds(&self) -> Result<Vec<DirectoryFund>, SourceError>;
}

impl RecordSource for Vec<ContributionRecord> {
    fn records(&self) -> Result<Vec<ContributionRecord>, SourceError> {
        Ok(self.clone())
    }
}

impl DirectorySource for DirectorySnapshot {
    fn people(&self) -> Result<Vec<DirectoryPerson>, SourceError> {
        Ok(self.people.clone())
    }

    fn funds(&self) -> Result<Vec<DirectoryFund>, SourceError> {
        Ok(self.funds.clone())
    }
}
