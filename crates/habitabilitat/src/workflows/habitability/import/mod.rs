mod batch;
mod parser;

pub use batch::{BatchEvaluation, BatchOutcome, BatchRow, EvaluationSummary, RejectedRow};
pub use parser::ImportedProperty;

use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum PropertyImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for PropertyImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyImportError::Io(err) => write!(f, "failed to read property CSV: {}", err),
            PropertyImportError::Csv(err) => write!(f, "invalid property CSV data: {}", err),
        }
    }
}

impl std::error::Error for PropertyImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PropertyImportError::Io(err) => Some(err),
            PropertyImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PropertyImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PropertyImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads property descriptions from a CSV whose headers are the camelCase input field names.
pub struct PropertyCsvImporter;

impl PropertyCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedProperty>, PropertyImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedProperty>, PropertyImportError> {
        Ok(parser::parse_rows(reader)?)
    }
}
