use almoner_core::{ContributionRecord, DirectoryFund, DirectoryPerson, FundId, PersonId, RecordId};
use serde::Serialize;
use std::fmt;

/// How a contributor name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy { score: u8 },
    None,
}

impl MatchKind {
    pub fn score(self) -> Option<u8> {
        match self {
            MatchKind::Exact => Some(100),
            MatchKind::Fuzzy { score } => Some(score),
            MatchKind::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Unmatched,
    Excluded,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "Matched"),
            MatchStatus::Unmatched => write!(f, "Unmatched"),
            MatchStatus::Excluded => write!(f, "Excluded"),
        }
    }
}

/// Why a record ended up where it did. Every per-record condition the engine
/// can hit is one of these; none of them is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum OutcomeReason {
    Exact,
    Fuzzy,
    /// Contributor name is too close to another name in the same batch.
    AmbiguousContributor { closest: String, score: u8 },
    NoConfidentMatch { best_score: u8 },
    /// More than one directory person carries the record's exact first and last name.
    DuplicateDirectoryEntries { count: usize },
    FundNotFound { threshold: u8 },
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeReason::Exact => write!(f, "exact"),
            OutcomeReason::Fuzzy => write!(f, "fuzzy"),
            OutcomeReason::AmbiguousContributor { .. } => write!(f, "ambiguous contributor name"),
            OutcomeReason::NoConfidentMatch { .. } => write!(f, "no confident fuzzy match"),
            OutcomeReason::DuplicateDirectoryEntries { .. } => {
                write!(f, "duplicate directory entries")
            }
            OutcomeReason::FundNotFound { threshold } => write!(f, "no fund match ≥{threshold}"),
        }
    }
}

/// A directory person a reviewer may want to look at. Never auto-applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub person_id: PersonId,
    pub name: String,
    pub score: u8,
}

impl Candidate {
    pub(crate) fn of(person: &DirectoryPerson, score: u8) -> Self {
        Candidate {
            person_id: person.id.clone(),
            name: person.full_name(),
            score,
        }
    }
}

/// The per-record verdict of one run. Created once and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub record_id: RecordId,
    pub status: MatchStatus,
    pub kind: MatchKind,
    pub person_id: Option<PersonId>,
    pub fund_id: Option<FundId>,
    pub reason: OutcomeReason,
    pub questionable: Vec<Candidate>,
}

impl MatchOutcome {
    pub fn score(&self) -> Option<u8> {
        self.kind.score()
    }

    pub fn requires_manual_entry(&self) -> bool {
        self.status != MatchStatus::Matched
    }
}

/// A record cleared for loading without human review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoLoadable {
    pub record_id: RecordId,
    pub record: ContributionRecord,
    pub person: DirectoryPerson,
    pub fund: DirectoryFund,
    pub kind: MatchKind,
}

/// A record held back, either for manual review or because it was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeldRecord {
    pub record_id: RecordId,
    pub record: ContributionRecord,
    pub reason: OutcomeReason,
    /// Set when the name resolved but the fund did not.
    pub person: Option<DirectoryPerson>,
    pub questionable: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub distinct_contributors: usize,
    pub auto_matched: usize,
    pub excluded: usize,
    /// Records whose contributor name did not resolve.
    pub unmatched: usize,
    /// Records whose name resolved but whose fund did not.
    pub fund_not_found: usize,
}

impl fmt::Display for ReconSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} out of {} contributors that matched. {} did not automatically match, \
             and {} more were excluded since the names were too similar.",
            self.auto_matched, self.distinct_contributors, self.unmatched, self.excluded
        )?;
        if self.fund_not_found > 0 {
            write!(f, " {} matched a contributor but no fund.", self.fund_not_found)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub matched: Vec<AutoLoadable>,
    pub manual_review: Vec<HeldRecord>,
    pub excluded: Vec<HeldRecord>,
    /// One outcome per input record, in input order.
    pub outcomes: Vec<MatchOutcome>,
    pub summary: ReconSummary,
}

impl ReconciliationResult {
    pub fn outcome(&self, id: RecordId) -> Option<&MatchOutcome> {
        self.outcomes.iter().find(|o| o.record_id == id)
    }
}
