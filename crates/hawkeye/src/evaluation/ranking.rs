use super::catalog::{Grade, Position};
use super::domain::{EvaluationRecord, PlayerId};
use super::scoring::Scored;
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;

thread_local! {
    static NAME_COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Sort strategy shared by the roster view and every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    #[default]
    Score,
    Name,
    Grade,
    Position,
}

impl RankingMode {
    pub const fn ordered() -> [Self; 4] {
        [Self::Score, Self::Name, Self::Grade, Self::Position]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Name => "name",
            Self::Grade => "grade",
            Self::Position => "position",
        }
    }

    /// Unknown modes fall back to `Score`.
    pub fn parse_or_default(raw: &str) -> Self {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(wanted))
            .unwrap_or_default()
    }
}

impl From<&str> for RankingMode {
    fn from(raw: &str) -> Self {
        Self::parse_or_default(raw)
    }
}

/// Filters by free-text search, then orders by `mode`.
///
/// Ties in `Score` mode keep whatever relative order the input had; callers
/// must not rely on it.
pub fn ranked_view(
    records: &[EvaluationRecord],
    mode: RankingMode,
    search_term: &str,
) -> Vec<EvaluationRecord> {
    let needle = search_term.to_lowercase();
    let mut ranked: Vec<EvaluationRecord> = records
        .iter()
        .filter(|record| matches_search(record, &needle))
        .cloned()
        .collect();

    ranked.sort_by(|left, right| compare(mode, left, right));
    ranked
}

/// `needle` must already be lowercase. An empty needle matches everything.
pub(crate) fn matches_search(record: &EvaluationRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [&record.first_name, &record.last_name, &record.number]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

pub fn compare(mode: RankingMode, left: &EvaluationRecord, right: &EvaluationRecord) -> Ordering {
    match mode {
        RankingMode::Score => by_score_desc(left, right),
        RankingMode::Name => locale_cmp(&left.last_name, &right.last_name),
        RankingMode::Grade => grade_key(left.grade)
            .cmp(&grade_key(right.grade))
            .then_with(|| by_score_desc(left, right)),
        RankingMode::Position => position_cmp(left.position, right.position)
            .then_with(|| by_score_desc(left, right)),
    }
}

fn by_score_desc(left: &EvaluationRecord, right: &EvaluationRecord) -> Ordering {
    right.total_score().cmp(&left.total_score())
}

fn grade_key(grade: Option<Grade>) -> u8 {
    grade.map(Grade::number).unwrap_or(0)
}

// Unset positions sort after every real one.
fn position_cmp(left: Option<Position>, right: Option<Position>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => locale_cmp(left.label(), right.label()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Unicode collation (CLDR root order): case and accents only break ties,
/// so `Élise` files under E and `smith` sits just ahead of `Smith`.
pub(crate) fn locale_cmp(left: &str, right: &str) -> Ordering {
    NAME_COLLATOR.with(|collator| collator.borrow_mut().collate(left, right))
}

/// Narrows the edit picker to one grade or one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionFilter {
    #[default]
    All,
    Grade(Option<Grade>),
    Position(Option<Position>),
}

impl SelectionFilter {
    fn keeps(&self, record: &EvaluationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Grade(grade) => record.grade == *grade,
            Self::Position(position) => record.position == *position,
        }
    }

    fn awaiting_value(&self) -> bool {
        matches!(self, Self::Grade(None) | Self::Position(None))
    }

    pub const fn key(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Grade(_) => "grade",
            Self::Position(_) => "position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    pub id: PlayerId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "options", rename_all = "snake_case")]
pub enum PickerOptions {
    /// A grade or position mode is active but no value has been chosen.
    AwaitingSelection,
    Empty,
    Players(Vec<PickerOption>),
}

/// Players available for editing, alphabetical by last name.
pub fn picker_options(records: &[EvaluationRecord], filter: &SelectionFilter) -> PickerOptions {
    if filter.awaiting_value() {
        return PickerOptions::AwaitingSelection;
    }

    let mut matching: Vec<&EvaluationRecord> =
        records.iter().filter(|record| filter.keeps(record)).collect();
    if matching.is_empty() {
        return PickerOptions::Empty;
    }

    matching.sort_by(|left, right| locale_cmp(&left.last_name, &right.last_name));
    PickerOptions::Players(
        matching
            .into_iter()
            .map(|record| PickerOption {
                id: record.id(),
                label: format!(
                    "{}, {} (#{})",
                    record.last_name, record.first_name, record.number
                ),
            })
            .collect(),
    )
}
