use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Left-pads a numeric id with zeros to `width`. Non-numeric ids and ids
    /// already at least `width` long come back unchanged.
    pub fn padded(&self, width: usize) -> PersonId {
        let raw = self.0.as_str();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return self.clone();
        }
        PersonId(format!("{raw:0>width$}"))
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundId(pub String);

impl fmt::Display for FundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPerson {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
}

impl DirectoryPerson {
    pub fn new(id: &str, first_name: &str, last_name: &str) -> Self {
        DirectoryPerson {
            id: PersonId(id.to_string()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFund {
    pub id: FundId,
    pub name: String,
}

impl DirectoryFund {
    pub fn new(id: &str, name: &str) -> Self {
        DirectoryFund {
            id: FundId(id.to_string()),
            name: name.to_string(),
        }
    }
}

/// People and funds as fetched once for a single reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub people: Vec<DirectoryPerson>,
    pub funds: Vec<DirectoryFund>,
}

impl DirectorySnapshot {
    pub fn new(people: Vec<DirectoryPerson>, funds: Vec<DirectoryFund>) -> Self {
        DirectorySnapshot { people, funds }
    }

    pub fn fund_names(&self) -> Vec<&str> {
        self.funds.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn person(&self, id: &PersonId) -> Option<&DirectoryPerson> {
        self.people.iter().find(|p| &p.id == id)
    }
}
