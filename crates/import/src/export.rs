use almoner_core::ContributionRecord;
use almoner_recon::{HeldRecord, MatchOutcome, ReconciliationResult};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MATCHED_FILE: &str = "matched.csv";
pub const MANUAL_REVIEW_FILE: &str = "manual_review.csv";
pub const EXCLUDED_FILE: &str = "excluded.csv";
pub const ALL_CONTRIBUTIONS_FILE: &str = "all_contributions.csv";

const HEADERS: [&str; 9] = [
    "Date",
    "Contributor Name",
    "Amount",
    "Fund",
    "Method",
    "Person ID",
    "Fund ID",
    "Score",
    "Reason",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Serialize)]
struct Row<'a> {
    date: String,
    contributor_name: &'a str,
    amount: String,
    fund: &'a str,
    method: &'a str,
    person_id: Option<&'a str>,
    fund_id: Option<&'a str>,
    score: Option<u8>,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    manually_enter: Option<&'static str>,
}

impl<'a> Row<'a> {
    fn new(record: &'a ContributionRecord, outcome: Option<&'a MatchOutcome>) -> Self {
        Row {
            date: record.date.format("%Y-%m-%d").to_string(),
            contributor_name: &record.contributor_name,
            amount: record.amount.to_string(),
            fund: &record.fund_name,
            method: &record.method,
            person_id: outcome.and_then(|o| o.person_id.as_ref()).map(|id| id.0.as_str()),
            fund_id: outcome.and_then(|o| o.fund_id.as_ref()).map(|id| id.0.as_str()),
            score: outcome.and_then(|o| o.score()),
            reason: outcome.map(|o| o.reason.to_string()).unwrap_or_default(),
            manually_enter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub matched: PathBuf,
    pub manual_review: PathBuf,
    pub excluded: PathBuf,
    pub all_contributions: PathBuf,
}

/// Writes the three partitions plus the combined sheet into `dir`.
pub fn export_partitions(dir: &Path, result: &ReconciliationResult) -> Result<ExportPaths, ExportError> {
    std::fs::create_dir_all(dir)?;
    let paths = ExportPaths {
        matched: dir.join(MATCHED_FILE),
        manual_review: dir.join(MANUAL_REVIEW_FILE),
        excluded: dir.join(EXCLUDED_FILE),
        all_contributions: dir.join(ALL_CONTRIBUTIONS_FILE),
    };

    write_matched(std::fs::File::create(&paths.matched)?, result)?;
    write_held(std::fs::File::create(&paths.manual_review)?, &result.manual_review, result)?;
    write_held(std::fs::File::create(&paths.excluded)?, &result.excluded, result)?;
    write_all(std::fs::File::create(&paths.all_contributions)?, result)?;

    tracing::info!(dir = %dir.display(), "exported reconciliation results");
    Ok(paths)
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(out)
}

pub fn write_matched<W: Write>(out: W, result: &ReconciliationResult) -> Result<(), ExportError> {
    let mut wtr = writer(out);
    wtr.write_record(HEADERS)?;
    for item in &result.matched {
        wtr.serialize(Row::new(&item.record, result.outcome(item.record_id)))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_held<W: Write>(
    out: W,
    held: &[HeldRecord],
    result: &ReconciliationResult,
) -> Result<(), ExportError> {
    let mut wtr = writer(out);
    wtr.write_record(HEADERS)?;
    for item in held {
        wtr.serialize(Row::new(&item.record, result.outcome(item.record_id)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Every record in upload order, flagged `Y` when someone has to key it in by hand.
pub fn write_all<W: Write>(out: W, result: &ReconciliationResult) -> Result<(), ExportError> {
    let mut rows: Vec<(_, &ContributionRecord)> = result
        .matched
        .iter()
        .map(|m| (m.record_id, &m.record))
        .chain(result.manual_review.iter().map(|h| (h.record_id, &h.record)))
        .chain(result.excluded.iter().map(|h| (h.record_id, &h.record)))
        .collect();
    rows.sort_by_key(|(id, _)| *id);

    let mut wtr = writer(out);
    let mut headers = HEADERS.to_vec();
    headers.push("Manually Enter");
    wtr.write_record(&headers)?;

    for (id, record) in rows {
        let outcome = result.outcome(id);
        let manual = outcome.map_or(true, MatchOutcome::requires_manual_entry);
        let row = Row {
            manually_enter: Some(if manual { "Y" } else { "N" }),
            ..Row::new(record, outcome)
        };
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
