use csv::{ReaderBuilder, Trim};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, info};

use super::{EsgTable, Record, FALLBACK_COLUMNS};

/// File name of the dataset, next to the crate manifest.
pub const DATA_FILE_NAME: &str = "esg_data.csv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("{} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::FileNotFound(_))
    }
}

/// Fixed location of the dataset: beside the service's own sources.
pub fn default_data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DATA_FILE_NAME)
}

/// Parse every row of `path` into a `Record`.
/// Any bad row fails the whole read. Only headers and numeric cells are
/// trimmed; divisions are kept exactly as written.
pub fn read_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Read {
            path: path.to_path_buf(),
            source: e.into(),
        },
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(file);

    let read_err = |source: csv::Error| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(read_err)?.clone();
    let missing: Vec<String> = FALLBACK_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut records = Vec::new();
    for result in rdr.deserialize::<Record>() {
        records.push(result.map_err(read_err)?);
    }
    Ok(records)
}

/// Build the startup snapshot. Never fails: a missing or malformed file
/// yields the empty fallback table.
pub fn load_table(path: &Path) -> EsgTable {
    match read_records(path) {
        Ok(records) => {
            info!(path = %path.display(), rows = records.len(), "ESG data loaded");
            EsgTable::loaded(records)
        }
        Err(e) if e.is_not_found() => {
            error!(
                path = %path.display(),
                "ESG data file not found; serving empty table. Place {} next to the service",
                DATA_FILE_NAME
            );
            EsgTable::fallback()
        }
        Err(e) => {
            error!(error = %e, "error while loading ESG data; serving empty table");
            EsgTable::fallback()
        }
    }
}
