use crate::evaluation::catalog::SkillAxis;
use crate::evaluation::domain::EvaluationRecord;
use crate::evaluation::scoring::Scored;
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;

/// Export base name for the unranked full roster.
pub const FULL_ROSTER_STEM: &str = "hawkeye_full_data";

const LEADING_COLUMNS: [&str; 5] = ["First Name", "Last Name", "Number", "Grade", "Position"];
const TRAILING_COLUMNS: [&str; 2] = ["Total Score", "Average"];

/// A rendered export, ready to be written to disk or sent as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub file_name: String,
    pub content_type: String,
    pub row_count: usize,
    pub body: String,
}

impl CsvExport {
    pub fn new(records: &[EvaluationRecord], stem: &str, date: NaiveDate) -> Self {
        Self {
            file_name: export_file_name(stem, date),
            content_type: mime::TEXT_CSV.to_string(),
            row_count: records.len(),
            body: to_csv(records),
        }
    }
}

pub fn export_file_name(stem: &str, date: NaiveDate) -> String {
    format!("{stem}_{}.csv", date.format("%Y-%m-%d"))
}

pub fn header_row() -> String {
    LEADING_COLUMNS
        .into_iter()
        .chain(SkillAxis::ordered().into_iter().map(SkillAxis::label))
        .chain(TRAILING_COLUMNS)
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders records in the order given. Rows are joined with `\n` and the
/// text has no trailing newline.
pub fn to_csv(records: &[EvaluationRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header_row());
    lines.extend(records.iter().map(data_row));
    lines.join("\n")
}

fn data_row(record: &EvaluationRecord) -> String {
    let grade = record.grade.map(|grade| grade.label()).unwrap_or_default();
    let position = record
        .position
        .map(|position| position.label())
        .unwrap_or_default();

    let mut fields: Vec<Cow<'_, str>> = vec![
        quoted(&record.first_name),
        quoted(&record.last_name),
        bare(&record.number),
        quoted(grade),
        quoted(position),
    ];
    fields.extend(
        record
            .skills
            .values()
            .map(|score| Cow::Owned(score.to_string())),
    );
    fields.push(Cow::Owned(record.total_score().to_string()));
    fields.push(Cow::Owned(format!("{:.2}", record.average_score())));
    fields.join(",")
}

fn quoted(value: &str) -> Cow<'static, str> {
    Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
}

// Bare unless the value would break the row apart.
fn bare(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        Cow::Borrowed(value)
    }
}
