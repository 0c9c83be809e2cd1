use super::catalog::{Grade, Position, SkillAxis, MAX_SCORE, MIN_SCORE};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identifier assigned to a player on first submit. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-process id source.
///
/// Seeded above every id already on the roster and above the wall clock in
/// milliseconds, so ids from earlier runs (which were clock based) are never
/// handed out again, and rapid bulk imports cannot collide.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn seeded<I>(existing: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = PlayerId>,
    {
        let floor = existing
            .into_iter()
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        let clock = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        Self {
            next: floor.max(clock),
        }
    }

    pub fn next_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Bump the sequence past an id that entered the roster from elsewhere.
    pub fn observe(&mut self, id: PlayerId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

/// One score per catalog axis. The fixed array keeps the key set identical
/// to the catalog at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkillScores([u8; SkillAxis::COUNT]);

impl SkillScores {
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: SkillAxis) -> u8 {
        self.0[axis.index()]
    }

    /// Store a score, clamped into the slider range.
    pub fn set(&mut self, axis: SkillAxis, score: u8) {
        self.0[axis.index()] = score.clamp(MIN_SCORE, MAX_SCORE);
    }

    pub fn with(mut self, axis: SkillAxis, score: u8) -> Self {
        self.set(axis, score);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillAxis, u8)> + '_ {
        SkillAxis::ordered()
            .into_iter()
            .map(move |axis| (axis, self.get(axis)))
    }

    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for SkillScores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(SkillAxis::COUNT))?;
        for (axis, score) in self.iter() {
            map.serialize_entry(axis.id(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillScores {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, f64>::deserialize(deserializer)?;
        let mut scores = SkillScores::zeroed();
        for (key, value) in raw {
            if let Some(axis) = SkillAxis::from_id(&key) {
                let clamped = value.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64);
                scores.set(axis, clamped as u8);
            }
        }
        Ok(scores)
    }
}

/// A persisted player evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub number: String,
    #[serde(default, with = "blank_as_none")]
    pub grade: Option<Grade>,
    #[serde(default, with = "blank_as_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub skills: SkillScores,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub(crate) fn from_draft(draft: PlayerDraft, id: PlayerId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            number: draft.number,
            grade: draft.grade,
            position: draft.position,
            skills: draft.skills,
            timestamp,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Form state for creating or editing an evaluation.
///
/// `id` is `None` for a player that has never been submitted. Names and
/// number may be blank while the form is being filled in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDraft {
    #[serde(default)]
    pub id: Option<PlayerId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default, with = "blank_as_none")]
    pub grade: Option<Grade>,
    #[serde(default, with = "blank_as_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub skills: SkillScores,
}

impl PlayerDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the fields a submission cannot go without.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<RequiredField> = [
            (RequiredField::FirstName, &self.first_name),
            (RequiredField::LastName, &self.last_name),
            (RequiredField::Number, &self.number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }
}

impl From<&EvaluationRecord> for PlayerDraft {
    fn from(record: &EvaluationRecord) -> Self {
        Self {
            id: Some(record.id),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            number: record.number.clone(),
            grade: record.grade,
            position: record.position,
            skills: record.skills,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    FirstName,
    LastName,
    Number,
}

impl RequiredField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Number => "jersey number",
        }
    }
}

/// Submission rejected before it reached the roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("please enter full name and jersey number (missing {})", join_labels(.missing))]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

fn join_labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The canonical player list. Newest entries sit at the front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<EvaluationRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&EvaluationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    /// Replaces the record with the same id in place, or adds it at the front.
    pub(crate) fn upsert(&mut self, record: EvaluationRecord) {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.insert(0, record),
        }
    }

    pub(crate) fn remove(&mut self, id: PlayerId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Adds new records ahead of the existing ones, keeping their order.
    pub(crate) fn prepend(&mut self, records: Vec<EvaluationRecord>) {
        let existing = std::mem::take(&mut self.records);
        self.records = records;
        self.records.extend(existing);
    }

    /// Replaces the whole list, keeping the first record seen for each id.
    /// Returns how many duplicates were dropped.
    pub(crate) fn replace(&mut self, records: Vec<EvaluationRecord>) -> usize {
        let incoming = records.len();
        let mut seen = HashSet::with_capacity(incoming);
        let kept: Vec<EvaluationRecord> = records
            .into_iter()
            .filter(|record| seen.insert(record.id))
            .collect();
        let dropped = incoming - kept.len();
        self.records = kept;
        dropped
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

/// Unset grades and positions travel as empty strings, never `null`.
/// Unrecognised values are treated as unset.
pub(crate) mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub(crate) fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match value {
            Some(inner) => serializer.collect_str(inner),
            None => serializer.serialize_str(""),
        }
    }

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| value.parse().ok()))
    }
}
