use std::io::Read;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};

use super::super::domain::PropertyInput;

/// One data row; `input` holds the deserialization error when the row is malformed.
#[derive(Debug)]
pub struct ImportedProperty {
    pub line: u64,
    pub input: Result<PropertyInput, String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportedProperty>, csv::Error> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers: StringRecord = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}'))
        .collect();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let row = match record {
            Ok(record) => ImportedProperty {
                line: record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(fallback_line),
                input: record
                    .deserialize::<PropertyInput>(Some(&headers))
                    .map_err(|error| error.to_string()),
            },
            Err(error) if matches!(error.kind(), ErrorKind::Io(_)) => return Err(error),
            Err(error) => ImportedProperty {
                line: error
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(fallback_line),
                input: Err(error.to_string()),
            },
        };
        rows.push(row);
    }

    Ok(rows)
}
