//! CSV export of ranked lists and bulk import of roster rows.
//!
//! The two directions do not share a contract: exports carry every skill
//! score plus totals, while imports only read identity columns and start
//! every skill at zero.

mod export;
mod import;

pub use export::{export_file_name, header_row, to_csv, CsvExport, FULL_ROSTER_STEM};
pub use import::{import_csv, import_from_reader, ImportOutcome};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV file: {0}")]
    Csv(#[from] csv::Error),
}
