use almoner_core::{ContributionRecord, DirectoryFund, DirectoryPerson, Money, RecordId};
use almoner_recon::{reconcile, MatchConfig, MatchKind, MatchStatus, OutcomeReason};
use chrono::NaiveDate;

fn record(name: &str, fund: &str) -> ContributionRecord {
    ContributionRecord::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        name,
        Money::from_cents(10000),
        fund,
        "Direct Deposit",
    )
    .unwrap()
}

fn people() -> Vec<DirectoryPerson> {
    vec![
        DirectoryPerson::new("1", "John", "Smith"),
        DirectoryPerson::new("2", "Mary", "Janes"),
        DirectoryPerson::new("3", "Maria", "Janes"),
        DirectoryPerson::new("4", "Peter", "Okafor"),
        DirectoryPerson::new("5", "Johnathan", "Smithson"),
    ]
}

fn funds() -> Vec<DirectoryFund> {
    vec![
        DirectoryFund::new("9", "Cemetery Fund"),
        DirectoryFund::new("1", "General Fund"),
        DirectoryFund::new("2", "General Fund - Memorial"),
    ]
}

// -------------------------------------------------------------------------
// End-to-end scenarios
// -------------------------------------------------------------------------

#[test]
fn john_smith_cemetery() {
    let records = vec![record("John Smith", "Cemetery")];
    let people = vec![DirectoryPerson::new("1", "John", "Smith")];
    let funds = vec![DirectoryFund::new("9", "Cemetery Fund")];

    let result = reconcile(&records, &people, &funds, &MatchConfig::default());

    assert_eq!(result.matched.len(), 1);
    assert_eq!(result.matched[0].person.id.0, "1");
    assert_eq!(result.matched[0].fund.id.0, "9");
    assert!(result.manual_review.is_empty());
    assert!(result.excluded.is_empty());

    let outcome = result.outcome(RecordId(0)).unwrap();
    assert_eq!(outcome.status, MatchStatus::Matched);
    assert_eq!(outcome.score(), Some(100));
    assert_eq!(outcome.reason.to_string(), "exact");
}

#[test]
fn nonsense_name_goes_to_manual_review() {
    let records = vec![record("Zzyx Qrrp", "General Fund")];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());

    assert!(result.matched.is_empty());
    assert_eq!(result.manual_review.len(), 1);
    assert_eq!(result.manual_review[0].reason.to_string(), "no confident fuzzy match");
    assert_eq!(result.outcomes[0].status, MatchStatus::Unmatched);
}

// -------------------------------------------------------------------------
// Matching properties
// -------------------------------------------------------------------------

#[test]
fn exact_match_beats_better_fuzzy_candidates() {
    // "Johnathan Smithson" is a strong partial candidate too; the exact
    // entry decides.
    let records = vec![record("John Smith", "General Fund")];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());
    assert_eq!(result.matched[0].person.id.0, "1");
    assert_eq!(result.matched[0].kind, MatchKind::Exact);
}

#[test]
fn fuzzy_boundary() {
    let people = vec![DirectoryPerson::new("2", "Mary", "Janes")];
    let at_90 = reconcile(&[record("Mary Jones", "General Fund")], &people, &funds(), &MatchConfig::default());
    assert!(at_90.matched.is_empty());
    assert_eq!(
        at_90.manual_review[0].reason,
        OutcomeReason::NoConfidentMatch { best_score: 90 }
    );

    let people = vec![DirectoryPerson::new("3", "Maria", "Janes")];
    let at_91 = reconcile(&[record("Maria Jones", "General Fund")], &people, &funds(), &MatchConfig::default());
    assert_eq!(at_91.matched.len(), 1);
    assert_eq!(at_91.matched[0].kind, MatchKind::Fuzzy { score: 91 });
}

#[test]
fn ambiguous_batch_names_are_excluded_before_matching() {
    let records = vec![
        record("John Smith", "General Fund"),
        record("Jon Smith", "General Fund"),
        record("Peter Okafor", "General Fund"),
    ];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());

    let excluded: Vec<_> = result.excluded.iter().map(|h| h.record_id).collect();
    assert_eq!(excluded, vec![RecordId(0), RecordId(1)]);
    assert!(result.matched.iter().all(|m| m.record_id == RecordId(2)));
    assert!(result.manual_review.is_empty());
    assert_eq!(result.summary.excluded, 2);
    assert_eq!(result.summary.auto_matched, 1);
}

#[test]
fn single_record_batch_is_never_excluded() {
    let config = MatchConfig {
        ambiguity_threshold: 0,
        ..MatchConfig::default()
    };
    let result = reconcile(&[record("John Smith", "Cemetery")], &people(), &funds(), &config);
    assert!(result.excluded.is_empty());
    assert_eq!(result.matched.len(), 1);
}

#[test]
fn fund_first_match_wins() {
    let records = vec![record("Peter Okafor", "General Fund")];
    let funds = vec![
        DirectoryFund::new("1", "General Fund"),
        DirectoryFund::new("2", "General Fund - Memorial"),
    ];
    let result = reconcile(&records, &people(), &funds, &MatchConfig::default());
    assert_eq!(result.matched[0].fund.id.0, "1");
}

#[test]
fn missing_fund_demotes_to_manual_review() {
    let records = vec![record("Peter Okafor", "Roof Appeal")];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());
    assert!(result.matched.is_empty());
    assert_eq!(result.manual_review[0].reason.to_string(), "no fund match ≥80");
    assert_eq!(result.summary.fund_not_found, 1);
    assert_eq!(result.summary.unmatched, 0);
}

#[test]
fn matched_ids_come_from_the_snapshot() {
    let records = vec![
        record("John Smith", "Cemetery"),
        record("Maria Jones", "General Fund"),
        record("Peter Okafor", "Memorial"),
    ];
    let people = people();
    let funds = funds();
    let result = reconcile(&records, &people, &funds, &MatchConfig::default());
    for outcome in &result.outcomes {
        if let Some(id) = &outcome.person_id {
            assert!(people.iter().any(|p| &p.id == id));
        }
        if let Some(id) = &outcome.fund_id {
            assert!(funds.iter().any(|f| &f.id == id));
        }
    }
}

#[test]
fn every_record_lands_in_exactly_one_partition() {
    let records = vec![
        record("John Smith", "Cemetery"),
        record("Jon Smith", "Cemetery"),
        record("Zzyx Qrrp", "Cemetery"),
        record("Peter Okafor", "Roof Appeal"),
        record("Maria Jones", "General Fund"),
    ];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());

    let mut seen: Vec<usize> = result
        .matched
        .iter()
        .map(|m| m.record_id.0)
        .chain(result.manual_review.iter().map(|h| h.record_id.0))
        .chain(result.excluded.iter().map(|h| h.record_id.0))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert_eq!(result.outcomes.len(), records.len());
}

#[test]
fn reconcile_is_idempotent() {
    let records = vec![
        record("John Smith", "Cemetery"),
        record("Jon Smith", "Cemetery"),
        record("Maria Jones", "General Fund"),
        record("Zzyx Qrrp", "General Fund"),
    ];
    let config = MatchConfig::default();
    let first = reconcile(&records, &people(), &funds(), &config);
    let second = reconcile(&records, &people(), &funds(), &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn amounts_serialize_with_two_places() {
    let records = vec![record("John Smith", "Cemetery")];
    let result = reconcile(&records, &people(), &funds(), &MatchConfig::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["matched"][0]["record"]["amount"], "100.00");
    assert_eq!(json["outcomes"][0]["kind"]["kind"], "exact");
}
