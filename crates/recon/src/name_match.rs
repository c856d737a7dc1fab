use almoner_core::{ContributionRecord, DirectoryPerson};

use crate::config::MatchConfig;
use crate::model::{Candidate, MatchKind, OutcomeReason};
use crate::similarity::partial_ratio;

/// Resolution of one contributor name against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch<'a> {
    pub person: Option<&'a DirectoryPerson>,
    pub kind: MatchKind,
    pub reason: OutcomeReason,
    /// Diagnostics for reviewers. Populated by the fuzzy pass and by
    /// duplicate exact hits.
    pub questionable: Vec<Candidate>,
}

impl NameMatch<'_> {
    pub fn is_matched(&self) -> bool {
        self.person.is_some()
    }
}

pub struct NameMatcher<'a> {
    people: &'a [DirectoryPerson],
    config: MatchConfig,
}

impl<'a> NameMatcher<'a> {
    pub fn new(people: &'a [DirectoryPerson], config: MatchConfig) -> Self {
        Self { people, config }
    }

    pub fn resolve(&self, record: &ContributionRecord) -> NameMatch<'a> {
        if record.has_full_name() {
            let exact: Vec<&'a DirectoryPerson> = self
                .people
                .iter()
                .filter(|p| p.first_name == record.first_name && p.last_name == record.last_name)
                .collect();

            match exact.as_slice() {
                [person] => {
                    return NameMatch {
                        person: Some(*person),
                        kind: MatchKind::Exact,
                        reason: OutcomeReason::Exact,
                        questionable: Vec::new(),
                    };
                }
                [] => {}
                duplicates => {
                    return NameMatch {
                        person: None,
                        kind: MatchKind::None,
                        reason: OutcomeReason::DuplicateDirectoryEntries {
                            count: duplicates.len(),
                        },
                        questionable: duplicates.iter().map(|p| Candidate::of(p, 100)).collect(),
                    };
                }
            }
        }

        self.resolve_fuzzy(record)
    }

    fn resolve_fuzzy(&self, record: &ContributionRecord) -> NameMatch<'a> {
        let name = record.contributor_name.as_str();
        let name_len = name.chars().count();

        let mut best_score = 0u8;
        let mut best_match: Option<&'a DirectoryPerson> = None;
        let mut questionable = Vec::new();

        for person in self.people {
            let full_name = person.full_name();
            let score = partial_ratio(name, &full_name);

            // Strictly greater: ties keep the earliest directory entry.
            if score > best_score {
                best_score = score;
                best_match = Some(person);
            }

            // A perfect partial score between strings of different length
            // usually means one name is buried inside the other.
            let buried = score == 100 && name_len != full_name.chars().count();
            if self.config.is_questionable_score(score) || buried {
                questionable.push(Candidate::of(person, score));
            }
        }

        match best_match {
            Some(person) if best_score > self.config.name_match_accept_threshold => NameMatch {
                person: Some(person),
                kind: MatchKind::Fuzzy { score: best_score },
                reason: OutcomeReason::Fuzzy,
                questionable,
            },
            _ => NameMatch {
                person: None,
                kind: MatchKind::None,
                reason: OutcomeReason::NoConfidentMatch { best_score },
                questionable,
            },
        }
    }
}
