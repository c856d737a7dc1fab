use almoner_core::{ContributionRecord, Money, RecordError};
use almoner_recon::{RecordSource, SourceError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;
use thiserror::Error;

pub const TEMPLATE_HEADERS: [&str; 5] = ["Date", "Contributor Name", "Amount", "Fund", "Method"];
const TEMPLATE_EXAMPLE: [&str; 5] = ["2023-01-01", "John Doe", "100.00", "Cemetery", "Direct Deposit"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionColumns {
    pub date_column: usize,
    pub contributor_column: usize,
    pub amount_column: usize,
    pub fund_column: usize,
    pub method_column: Option<usize>,
    pub date_format: String,
}

impl Default for ContributionColumns {
    fn default() -> Self {
        Self {
            date_column: 0,
            contributor_column: 1,
            amount_column: 2,
            fund_column: 3,
            method_column: Some(4),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// How to read an uploaded contribution sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionCsvProfile {
    #[serde(flatten)]
    pub mapping: ContributionColumns,
    pub has_header: bool,
    pub delimiter: String,
    /// Used when the method column is absent or blank.
    pub default_method: String,
}

impl Default for ContributionCsvProfile {
    fn default() -> Self {
        Self {
            mapping: ContributionColumns::default(),
            has_header: true,
            delimiter: ",".to_string(),
            default_method: "Direct Deposit".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },
    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },
    #[error("Row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: RecordError,
    },
    #[error("No data rows")]
    NoDataRows,
}

pub struct ContributionImporter;

impl ContributionImporter {
    pub fn parse_profile<R: Read>(
        reader: &mut csv::Reader<R>,
        profile: &ContributionCsvProfile,
    ) -> Result<Vec<ContributionRecord>, CsvError> {
        let mut records = Vec::new();
        let mapping = &profile.mapping;
        let first_row = if profile.has_header { 2 } else { 1 };

        for (idx, result) in reader.records().enumerate() {
            let row = first_row + idx;
            let fields = result?;

            if fields.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let raw_date = field(&fields, row, mapping.date_column)?;
            let date = parse_date(raw_date, &mapping.date_format).ok_or_else(|| {
                CsvError::InvalidDate {
                    row,
                    value: raw_date.to_string(),
                }
            })?;

            let raw_amount = field(&fields, row, mapping.amount_column)?;
            let amount: Money = raw_amount.parse().map_err(|_| CsvError::InvalidAmount {
                row,
                value: raw_amount.to_string(),
            })?;

            let method = mapping
                .method_column
                .and_then(|col| fields.get(col))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(profile.default_method.as_str());

            let record = ContributionRecord::new(
                date,
                field(&fields, row, mapping.contributor_column)?,
                amount,
                field(&fields, row, mapping.fund_column)?,
                method,
            )
            .map_err(|source| CsvError::InvalidRecord { row, source })?;

            records.push(record);
        }

        if records.is_empty() {
            return Err(CsvError::NoDataRows);
        }

        tracing::debug!(rows = records.len(), "parsed contribution upload");
        Ok(records)
    }
}

fn field(fields: &csv::StringRecord, row: usize, column: usize) -> Result<&str, CsvError> {
    fields
        .get(column)
        .map(str::trim)
        .ok_or(CsvError::MissingColumn { row, column })
}

fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, format) {
        return Some(date);
    }

    for fmt in &[
        "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y", "%Y-%m-%d",
    ] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Spreadsheet exports often carry a midnight timestamp.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn reader_for<R: Read>(data: R, profile: &ContributionCsvProfile) -> csv::Reader<R> {
    let delimiter = profile
        .delimiter
        .as_bytes()
        .first()
        .copied()
        .unwrap_or(b',');
    csv::ReaderBuilder::new()
        .has_headers(profile.has_header)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data)
}

pub fn import_contributions<R: Read>(
    data: R,
    profile: &ContributionCsvProfile,
) -> Result<Vec<ContributionRecord>, CsvError> {
    let mut reader = reader_for(data, profile);
    ContributionImporter::parse_profile(&mut reader, profile)
}

/// Writes the upload template: header plus one example row.
pub fn write_template<W: Write>(writer: W) -> Result<(), CsvError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TEMPLATE_HEADERS)?;
    wtr.write_record(TEMPLATE_EXAMPLE)?;
    wtr.flush()?;
    Ok(())
}

/// Record source backed by an uploaded CSV file.
pub struct CsvRecordSource {
    pub path: PathBuf,
    pub profile: ContributionCsvProfile,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>, profile: ContributionCsvProfile) -> Self {
        Self {
            path: path.into(),
            profile,
        }
    }
}

impl RecordSource for CsvRecordSource {
    fn records(&self) -> Result<Vec<ContributionRecord>, SourceError> {
        let file = std::fs::File::open(&self.path).map_err(SourceError::new)?;
        import_contributions(file, &self.profile).map_err(SourceError::new)
    }
}
