use std::collections::{HashMap, HashSet};

use almoner_core::{ContributionRecord, RecordId};

use crate::model::OutcomeReason;
use crate::similarity::ratio;

/// Closest other name in the batch for a flagged contributor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearDuplicate {
    pub closest: String,
    pub score: u8,
}

/// Records split by the ambiguity screen, borrowing from the input batch.
#[derive(Debug, Default)]
pub struct Screened<'a> {
    pub excluded: Vec<(RecordId, &'a ContributionRecord, OutcomeReason)>,
    pub candidates: Vec<(RecordId, &'a ContributionRecord)>,
}

/// Withholds every record whose contributor name is too close to a different
/// contributor name in the same batch.
pub struct AmbiguityFilter {
    pub threshold: u8,
}

impl AmbiguityFilter {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Flagged names with the best-scoring other name for each.
    /// Identical names are never compared with each other.
    pub fn ambiguous_names<'a>(
        &self,
        records: &'a [ContributionRecord],
    ) -> HashMap<&'a str, NearDuplicate> {
        let names = distinct_names(records);
        let mut best: Vec<Option<(u8, usize)>> = vec![None; names.len()];

        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let score = ratio(names[i], names[j]);
                for (this, other) in [(i, j), (j, i)] {
                    if best[this].map_or(true, |(s, _)| score > s) {
                        best[this] = Some((score, other));
                    }
                }
            }
        }

        names
            .iter()
            .zip(best)
            .filter_map(|(name, best)| {
                let (score, other) = best?;
                (score > self.threshold).then(|| {
                    (
                        *name,
                        NearDuplicate {
                            closest: names[other].to_string(),
                            score,
                        },
                    )
                })
            })
            .collect()
    }

    pub fn screen<'a>(&self, records: &'a [ContributionRecord]) -> Screened<'a> {
        let flagged = self.ambiguous_names(records);
        let mut screened = Screened::default();

        for (idx, record) in records.iter().enumerate() {
            let id = RecordId(idx);
            match flagged.get(record.contributor_name.as_str()) {
                Some(near) => {
                    tracing::debug!(
                        record = %id,
                        closest = %near.closest,
                        score = near.score,
                        "excluding ambiguous contributor"
                    );
                    screened.excluded.push((
                        id,
                        record,
                        OutcomeReason::AmbiguousContributor {
                            closest: near.closest.clone(),
                            score: near.score,
                        },
                    ));
                }
                None => screened.candidates.push((id, record)),
            }
        }

        screened
    }
}

/// Distinct contributor names in first-seen order.
pub fn distinct_names(records: &[ContributionRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.contributor_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
