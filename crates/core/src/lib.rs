pub mod contribution;
pub mod directory;
pub mod money;

pub use contribution::{ContributionRecord, RecordError, RecordId};
pub use directory::{DirectoryFund, DirectoryPerson, DirectorySnapshot, FundId, PersonId};
pub use money::{Money, MoneyError};
