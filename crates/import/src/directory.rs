use almoner_core::{DirectoryFund, DirectoryPerson};
use almoner_recon::{DirectorySource, SourceError};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Directory export on disk: one people file and one funds file.
///
/// Files ending in `.json` hold an array of objects; anything else is read
/// as CSV with a header row (`id,first_name,last_name` / `id,name`).
#[derive(Debug, Clone)]
pub struct FileDirectory {
    pub people_path: PathBuf,
    pub funds_path: PathBuf,
}

impl FileDirectory {
    pub fn new(people_path: impl Into<PathBuf>, funds_path: impl Into<PathBuf>) -> Self {
        Self {
            people_path: people_path.into(),
            funds_path: funds_path.into(),
        }
    }
}

impl DirectorySource for FileDirectory {
    fn people(&self) -> Result<Vec<DirectoryPerson>, SourceError> {
        read_people(&self.people_path).map_err(SourceError::new)
    }

    fn funds(&self) -> Result<Vec<DirectoryFund>, SourceError> {
        read_funds(&self.funds_path).map_err(SourceError::new)
    }
}

pub fn read_people(path: &Path) -> Result<Vec<DirectoryPerson>, DirectoryError> {
    let people = read_rows(path)?;
    tracing::debug!(path = %path.display(), count = people.len(), "loaded people");
    Ok(people)
}

pub fn read_funds(path: &Path) -> Result<Vec<DirectoryFund>, DirectoryError> {
    let funds = read_rows(path)?;
    tracing::debug!(path = %path.display(), count = funds.len(), "loaded funds");
    Ok(funds)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DirectoryError> {
    let file = File::open(path).map_err(|source| DirectoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_reader(BufReader::new(file))?)
    } else {
        parse_csv_rows(file)
    }
}

fn parse_csv_rows<T: DeserializeOwned, R: Read>(data: R) -> Result<Vec<T>, DirectoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}
