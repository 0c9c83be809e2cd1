use super::CodecError;
use crate::evaluation::catalog::{Grade, Position};
use crate::evaluation::domain::{EvaluationRecord, IdSequence, PlayerDraft};
use chrono::{DateTime, Utc};
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;
use tracing::{debug, warn};

const MIN_FIELDS: usize = 3;
const PLACEHOLDER_NAME: &str = "Unknown";
const PLACEHOLDER_NUMBER: &str = "0";

/// Result of a structurally valid import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported(Vec<EvaluationRecord>),
    /// The file parsed but no row carried enough columns.
    NoRows,
}

impl ImportOutcome {
    pub fn len(&self) -> usize {
        match self {
            Self::Imported(records) => records.len(),
            Self::NoRows => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn import_csv(
    text: &str,
    ids: &mut IdSequence,
    timestamp: DateTime<Utc>,
) -> Result<ImportOutcome, CodecError> {
    import_from_reader(text.as_bytes(), ids, timestamp)
}

/// Reads roster rows as `first, last, number[, grade[, position]]`.
///
/// The first line is always treated as a header and never inspected, even
/// when it is blank. Trailing columns, including exported skill scores, are
/// ignored. Nothing is returned unless the whole input parses.
pub fn import_from_reader<R: Read>(
    reader: R,
    ids: &mut IdSequence,
    timestamp: DateTime<Utc>,
) -> Result<ImportOutcome, CodecError> {
    let mut reader = BufReader::new(reader);
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut drafts = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.records() {
        let row = row?;
        if row.len() < MIN_FIELDS {
            skipped += 1;
            continue;
        }
        drafts.push(draft_from_row(&row));
    }

    if skipped > 0 {
        debug!(skipped, min_fields = MIN_FIELDS, "skipped short CSV rows");
    }

    if drafts.is_empty() {
        return Ok(ImportOutcome::NoRows);
    }

    let records = drafts
        .into_iter()
        .map(|draft| EvaluationRecord::from_draft(draft, ids.next_id(), timestamp))
        .collect();
    Ok(ImportOutcome::Imported(records))
}

fn draft_from_row(row: &csv::StringRecord) -> PlayerDraft {
    let column = |index: usize| row.get(index).map(strip_quotes).unwrap_or_default();

    PlayerDraft {
        id: None,
        first_name: or_placeholder(column(0), PLACEHOLDER_NAME),
        last_name: or_placeholder(column(1), PLACEHOLDER_NAME),
        number: or_placeholder(column(2), PLACEHOLDER_NUMBER),
        grade: catalog_value::<Grade>(column(3)),
        position: catalog_value::<Position>(column(4)),
        ..PlayerDraft::new()
    }
}

// Catches quotes the CSV parser keeps literally, e.g. after leading spaces.
fn strip_quotes(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn catalog_value<T>(value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if value.is_empty() {
        return None;
    }

    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(%err, "imported value left unset");
            None
        }
    }
}
