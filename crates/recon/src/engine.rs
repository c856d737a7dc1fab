use almoner_core::{ContributionRecord, DirectoryFund, DirectoryPerson, DirectorySnapshot, RecordId};

use crate::ambiguity::{distinct_names, AmbiguityFilter};
use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::fund_match::FundMatcher;
use crate::model::{
    AutoLoadable, Candidate, HeldRecord, MatchKind, MatchOutcome, MatchStatus, OutcomeReason,
    ReconciliationResult,
};
use crate::name_match::NameMatcher;
use crate::source::{DirectorySource, RecordSource};

/// Reconcile one batch against one directory snapshot.
///
/// Runs the ambiguity screen, then name matching, then fund matching, and
/// partitions the batch into auto-loadable, manual-review and excluded
/// records. Pure: the same inputs always give the same result.
pub fn reconcile(
    records: &[ContributionRecord],
    people: &[DirectoryPerson],
    funds: &[DirectoryFund],
    config: &MatchConfig,
) -> ReconciliationResult {
    let screened = AmbiguityFilter::new(config.ambiguity_threshold).screen(records);
    let names = NameMatcher::new(people, *config);
    let fund_matcher = FundMatcher::new(funds, config.fund_match_threshold);

    let mut result = ReconciliationResult::default();

    for (record_id, record, reason) in screened.excluded {
        result.outcomes.push(MatchOutcome {
            record_id,
            status: MatchStatus::Excluded,
            kind: MatchKind::None,
            person_id: None,
            fund_id: None,
            reason: reason.clone(),
            questionable: Vec::new(),
        });
        result.excluded.push(HeldRecord {
            record_id,
            record: record.clone(),
            reason,
            person: None,
            questionable: Vec::new(),
        });
    }

    for (record_id, record) in screened.candidates {
        let name_match = names.resolve(record);

        let Some(person) = name_match.person else {
            tracing::debug!(record = %record_id, reason = %name_match.reason, "name unmatched");
            result.summary.unmatched += 1;
            let held = Held {
                record_id,
                record,
                kind: MatchKind::None,
                reason: name_match.reason,
                person: None,
            };
            held.push_into(&mut result, name_match.questionable);
            continue;
        };

        tracing::debug!(
            record = %record_id,
            person = %person.id,
            score = name_match.kind.score(),
            "name matched"
        );

        match fund_matcher.resolve(&record.fund_name) {
            Some(fund) => {
                result.outcomes.push(MatchOutcome {
                    record_id,
                    status: MatchStatus::Matched,
                    kind: name_match.kind,
                    person_id: Some(person.id.clone()),
                    fund_id: Some(fund.id.clone()),
                    reason: name_match.reason,
                    questionable: name_match.questionable,
                });
                result.matched.push(AutoLoadable {
                    record_id,
                    record: record.clone(),
                    person: person.clone(),
                    fund: fund.clone(),
                    kind: name_match.kind,
                });
            }
            None => {
                tracing::warn!(
                    record = %record_id,
                    fund = %record.fund_name,
                    "fund not found, holding for manual review"
                );
                result.summary.fund_not_found += 1;
                let held = Held {
                    record_id,
                    record,
                    kind: name_match.kind,
                    reason: OutcomeReason::FundNotFound {
                        threshold: config.fund_match_threshold,
                    },
                    person: Some(person),
                };
                held.push_into(&mut result, name_match.questionable);
            }
        }
    }

    result.outcomes.sort_by_key(|o| o.record_id);

    result.summary.total_records = records.len();
    result.summary.distinct_contributors = distinct_names(records).len();
    result.summary.auto_matched = result.matched.len();
    result.summary.excluded = result.excluded.len();

    tracing::info!(
        total = result.summary.total_records,
        auto_matched = result.summary.auto_matched,
        manual_review = result.manual_review.len(),
        excluded = result.summary.excluded,
        "reconciliation complete"
    );

    result
}

/// A record routed to manual review.
struct Held<'a> {
    record_id: RecordId,
    record: &'a ContributionRecord,
    kind: MatchKind,
    reason: OutcomeReason,
    person: Option<&'a DirectoryPerson>,
}

impl Held<'_> {
    fn push_into(self, result: &mut ReconciliationResult, questionable: Vec<Candidate>) {
        result.outcomes.push(MatchOutcome {
            record_id: self.record_id,
            status: MatchStatus::Unmatched,
            kind: self.kind,
            person_id: self.person.map(|p| p.id.clone()),
            fund_id: None,
            reason: self.reason.clone(),
            questionable: questionable.clone(),
        });
        result.manual_review.push(HeldRecord {
            record_id: self.record_id,
            record: self.record.clone(),
            reason: self.reason,
            person: self.person.cloned(),
            questionable,
        });
    }
}

/// Reconcile a snapshot as a single value.
pub fn reconcile_snapshot(
    records: &[ContributionRecord],
    snapshot: &DirectorySnapshot,
    config: &MatchConfig,
) -> ReconciliationResult {
    reconcile(records, &snapshot.people, &snapshot.funds, config)
}

/// Fetch records and the directory exactly once, then reconcile.
///
/// Any collaborator failure aborts the run; no partial result is produced.
pub fn reconcile_sources<R, D>(
    records: &R,
    directory: &D,
    config: &MatchConfig,
) -> Result<ReconciliationResult, ReconError>
where
    R: RecordSource + ?Sized,
    D: DirectorySource + ?Sized,
{
    config.validate()?;

    let people = directory.people().map_err(ReconError::DirectorySnapshot)?;
    if people.is_empty() {
        return Err(ReconError::EmptyDirectory("people"));
    }
    let funds = directory.funds().map_err(ReconError::DirectorySnapshot)?;
    if funds.is_empty() {
        return Err(ReconError::EmptyDirectory("funds"));
    }
    let records = records.records().map_err(ReconError::RecordSource)?;

    Ok(reconcile(&records, &people, &funds, config))
}
