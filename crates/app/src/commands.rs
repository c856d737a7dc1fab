use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use almoner_core::DirectorySnapshot;
use almoner_import::{export_partitions, write_template, CsvRecordSource, FileDirectory};
use almoner_recon::{
    load_all, reconcile_sources, BatchInfo, DirectorySource, OutcomeReason, ReconError,
    ReconciliationResult,
};
use anyhow::Context;

use crate::config::AppConfig;
use crate::dry_run::DryRunLoader;

/// The three files one run reads.
pub struct Inputs {
    pub records: PathBuf,
    pub people: PathBuf,
    pub funds: PathBuf,
}

pub fn cmd_template(out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot write {}", path.display()))?;
            write_template(file)?;
            eprintln!("wrote {}", path.display());
        }
        None => write_template(std::io::stdout().lock())?,
    }
    Ok(())
}

/// Reads the directory files once and reconciles the upload against them.
/// The snapshot comes back so callers can show it next to held records.
pub fn run(
    config: &AppConfig,
    inputs: &Inputs,
) -> anyhow::Result<(ReconciliationResult, DirectorySnapshot)> {
    let records = CsvRecordSource::new(&inputs.records, config.import.clone());
    let directory = FileDirectory::new(&inputs.people, &inputs.funds);
    let snapshot = DirectorySnapshot::new(
        directory.people().map_err(ReconError::DirectorySnapshot)?,
        directory.funds().map_err(ReconError::DirectorySnapshot)?,
    );
    let result = reconcile_sources(&records, &snapshot, &config.matching)?;
    Ok((result, snapshot))
}

pub fn cmd_reconcile(
    config: &AppConfig,
    inputs: &Inputs,
    out_dir: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let (result, snapshot) = run(config, inputs)?;

    if let Some(dir) = out_dir {
        let paths = export_partitions(dir, &result)
            .with_context(|| format!("cannot export to {}", dir.display()))?;
        eprintln!("wrote {}", paths.all_contributions.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        print_review(&mut out, &result, &snapshot)?;
    }
    Ok(())
}

fn print_review(
    out: &mut impl Write,
    result: &ReconciliationResult,
    snapshot: &DirectorySnapshot,
) -> std::io::Result<()> {
    writeln!(out, "{}", result.summary)?;
    for held in &result.manual_review {
        writeln!(out, "  review {} {}: {}", held.record_id, held.record.contributor_name, held.reason)?;
        for candidate in &held.questionable {
            writeln!(out, "      maybe {} ({}) score {}", candidate.name, candidate.person_id, candidate.score)?;
        }
    }
    if result
        .manual_review
        .iter()
        .any(|h| matches!(h.reason, OutcomeReason::FundNotFound { .. }))
    {
        writeln!(out, "  known funds: {}", snapshot.fund_names().join(", "))?;
    }
    for held in &result.excluded {
        writeln!(out, "  excluded {} {}: {}", held.record_id, held.record.contributor_name, held.reason)?;
    }
    Ok(())
}

pub fn cmd_load(
    config: &AppConfig,
    inputs: &Inputs,
    payments: &Path,
    batch_name: Option<&str>,
) -> anyhow::Result<()> {
    let (result, _) = run(config, inputs)?;

    let batch = BatchInfo::new(
        batch_name.unwrap_or(config.loader.batch_name.as_str()),
        chrono::Local::now().naive_local(),
    );
    let file = File::create(payments).with_context(|| format!("cannot write {}", payments.display()))?;
    let mut loader = DryRunLoader::new(BufWriter::new(file));
    let report = load_all(&mut loader, &result, &batch, config.loader.person_id_width);
    loader.into_inner().flush()?;

    println!("{}", result.summary);
    println!(
        "Loaded {} contributions in group {} ({} failed).",
        report.loaded.len(),
        batch.group,
        report.failed.len()
    );
    for (record_id, err) in &report.failed {
        eprintln!("  {record_id}: {err}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(dir: &Path) -> Inputs {
        let records = dir.join("upload.csv");
        let people = dir.join("people.csv");
        let funds = dir.join("funds.csv");
        std::fs::write(
            &records,
            "Date,Contributor Name,Amount,Fund,Method\n\
             2024-01-15,John Smith,100,Cemetery,Check\n\
             2024-01-15,Jon Smith,10,Cemetery,Check\n\
             2024-01-15,Peter Okafor,25.5,General,Cash\n\
             2024-01-15,Zzyx Qrrp,5,General,Cash\n",
        )
        .unwrap();
        std::fs::write(&people, "id,first_name,last_name\n1234,John,Smith\n77,Peter,Okafor\n").unwrap();
        std::fs::write(&funds, "id,name\n9,Cemetery Fund\n1,General Fund\n").unwrap();
        Inputs { records, people, funds }
    }

    #[test]
    fn run_partitions_upload() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, snapshot) = run(&AppConfig::default(), &inputs(tmp.path())).unwrap();
        assert_eq!(snapshot.people.len(), 2);
        assert_eq!(result.excluded.len(), 2);
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.manual_review.len(), 1);
    }

    #[test]
    fn review_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, snapshot) = run(&AppConfig::default(), &inputs(tmp.path())).unwrap();
        let mut buf = Vec::new();
        print_review(&mut buf, &result, &snapshot).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Found 1 out of 4 contributors that matched."));
        assert!(text.contains("review #3 Zzyx Qrrp: no confident fuzzy match"));
        assert!(text.contains("excluded #0 John Smith: ambiguous contributor name"));
        assert!(!text.contains("known funds"));
    }

    #[test]
    fn review_listing_shows_funds_on_fund_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let inputs = inputs(tmp.path());
        std::fs::write(&inputs.records, "Date,Contributor Name,Amount,Fund,Method\n2024-01-15,Peter Okafor,5,Roof Appeal,Cash\n").unwrap();
        let (result, snapshot) = run(&AppConfig::default(), &inputs).unwrap();
        let mut buf = Vec::new();
        print_review(&mut buf, &result, &snapshot).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("review #0 Peter Okafor: no fund match ≥80"));
        assert!(text.contains("known funds: Cemetery Fund, General Fund"));
    }

    #[test]
    fn reconcile_exports_when_asked() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("results");
        cmd_reconcile(&AppConfig::default(), &inputs(tmp.path()), Some(&out), true).unwrap();
        assert!(out.join("matched.csv").exists());
        assert!(out.join("all_contributions.csv").exists());
    }

    #[test]
    fn load_writes_padded_payloads() {
        let tmp = tempfile::tempdir().unwrap();
        let payments = tmp.path().join("payments.jsonl");
        cmd_load(&AppConfig::default(), &inputs(tmp.path()), &payments, Some("Sunday")).unwrap();

        let text = std::fs::read_to_string(&payments).unwrap();
        let lines: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["person_id"], "00000077");
        assert_eq!(lines[0]["batch_name"], "Sunday");
        assert_eq!(lines[0]["funds"][0]["id"], "1");
    }

    #[test]
    fn missing_upload_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut inputs = inputs(tmp.path());
        inputs.records = tmp.path().join("nope.csv");
        let err = run(&AppConfig::default(), &inputs).unwrap_err();
        assert!(err.to_string().starts_with("Record source failed"));
    }

    #[test]
    fn template_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("template.csv");
        cmd_template(Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,Contributor Name,Amount,Fund,Method"));
    }
}
