use std::fs::File;
use std::path::Path;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::codec::{self, CodecError, CsvExport, ImportOutcome, FULL_ROSTER_STEM};
use super::domain::{EvaluationRecord, PlayerDraft, PlayerId, ValidationError};
use super::ranking::{picker_options, ranked_view, PickerOptions, RankingMode, SelectionFilter};
use super::report::{RankedEntry, Report, ReportKind};
use super::store::{RosterBlob, RosterStore, StoreError};

/// Toggles the presentation layer flips between renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub sort_mode: RankingMode,
    pub search_term: String,
    pub report_kind: ReportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short message for the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(EvaluationRecord),
    Updated(EvaluationRecord),
}

impl SubmitOutcome {
    pub fn record(&self) -> &EvaluationRecord {
        match self {
            Self::Created(record) | Self::Updated(record) => record,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::Created(_) => Notice::success("Player added successfully!"),
            Self::Updated(_) => Notice::success("Evaluation updated!"),
        }
    }
}

/// What an import did to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub ids: Vec<PlayerId>,
}

impl ImportSummary {
    pub fn notice(&self) -> Notice {
        if self.imported == 0 {
            Notice::info("No valid player data found")
        } else {
            Notice::success(format!("Imported {} players!", self.imported))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(_) => Notice::error("Please enter full name and jersey number"),
            Self::Codec(_) => Notice::error("Failed to parse CSV file"),
            other => Notice::error(other.to_string()),
        }
    }
}

/// Everything the presentation layer can ask of the roster.
///
/// Owns the store; ranking and CSV functions only ever see slices of it.
pub struct EvaluationService<B> {
    store: RosterStore<B>,
    view: ViewSettings,
}

impl<B: RosterBlob> EvaluationService<B> {
    pub fn new(store: RosterStore<B>) -> Self {
        Self {
            store,
            view: ViewSettings::default(),
        }
    }

    pub fn open(blob: B) -> Self {
        Self::new(RosterStore::load(blob))
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        self.store.records()
    }

    pub fn view_settings(&self) -> &ViewSettings {
        &self.view
    }

    /// Creates a player for a draft without an id, otherwise replaces the
    /// stored record wholesale. Nothing changes when validation fails.
    pub fn submit(&mut self, draft: PlayerDraft) -> Result<SubmitOutcome, ServiceError> {
        draft.validate()?;
        let now = Utc::now();

        let outcome = match draft.id {
            Some(id) => {
                if self.store.get(id).is_none() {
                    return Err(ServiceError::UnknownPlayer(id));
                }
                let record = EvaluationRecord::from_draft(draft, id, now);
                self.store.upsert(record.clone())?;
                SubmitOutcome::Updated(record)
            }
            None => {
                let id = self.store.next_id();
                let record = EvaluationRecord::from_draft(draft, id, now);
                self.store.upsert(record.clone())?;
                SubmitOutcome::Created(record)
            }
        };

        info!(id = %outcome.record().id(), "evaluation saved");
        Ok(outcome)
    }

    pub fn delete(&mut self, id: PlayerId) -> Result<bool, ServiceError> {
        let removed = self.store.delete(id)?;
        if removed {
            info!(%id, "player deleted");
        }
        Ok(removed)
    }

    pub fn reset_all(&mut self) -> Result<(), ServiceError> {
        let cleared = self.store.records().len();
        self.store.clear()?;
        warn!(cleared, "roster reset");
        Ok(())
    }

    pub fn set_sort_mode(&mut self, mode: RankingMode) {
        self.view.sort_mode = mode;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view.search_term = term.into();
    }

    pub fn set_report_kind(&mut self, kind: ReportKind) {
        self.view.report_kind = kind;
    }

    /// The roster tab: current sort mode and search term.
    pub fn roster_view(&self) -> Vec<RankedEntry> {
        let ranked = ranked_view(
            self.store.records(),
            self.view.sort_mode,
            &self.view.search_term,
        );
        RankedEntry::number_all(ranked)
    }

    /// The reports tab: current report kind and search term.
    pub fn report(&self) -> Report {
        Report::build(
            self.store.records(),
            self.view.report_kind,
            &self.view.search_term,
        )
    }

    /// Loads a stored record back into form state for editing.
    pub fn draft_for(&self, id: PlayerId) -> Option<PlayerDraft> {
        self.store.get(id).map(PlayerDraft::from)
    }

    pub fn picker_options(&self, filter: &SelectionFilter) -> PickerOptions {
        picker_options(self.store.records(), filter)
    }

    /// Adds every valid row as a new player. A parse failure leaves the
    /// roster untouched.
    pub fn import_csv(&mut self, text: &str) -> Result<ImportSummary, ServiceError> {
        let outcome = codec::import_csv(text, self.store.ids_mut(), Utc::now())?;
        self.apply_import(outcome)
    }

    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportSummary, ServiceError> {
        let file = File::open(path).map_err(CodecError::from)?;
        let outcome = codec::import_from_reader(file, self.store.ids_mut(), Utc::now())?;
        self.apply_import(outcome)
    }

    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<ImportSummary, ServiceError> {
        let outcome = codec::import_from_reader(bytes, self.store.ids_mut(), Utc::now())?;
        self.apply_import(outcome)
    }

    fn apply_import(&mut self, outcome: ImportOutcome) -> Result<ImportSummary, ServiceError> {
        match outcome {
            ImportOutcome::Imported(records) => {
                let ids: Vec<PlayerId> = records.iter().map(EvaluationRecord::id).collect();
                self.store.prepend_all(records)?;
                info!(imported = ids.len(), "players imported");
                Ok(ImportSummary {
                    imported: ids.len(),
                    ids,
                })
            }
            ImportOutcome::NoRows => {
                info!("import contained no usable rows");
                Ok(ImportSummary {
                    imported: 0,
                    ids: Vec::new(),
                })
            }
        }
    }

    /// Renders `records` as a dated CSV. Nothing is produced for an empty list.
    pub fn export_csv(&self, records: &[EvaluationRecord], stem: &str) -> Option<CsvExport> {
        self.export_csv_on(records, stem, Local::now().date_naive())
    }

    pub fn export_csv_on(
        &self,
        records: &[EvaluationRecord],
        stem: &str,
        date: NaiveDate,
    ) -> Option<CsvExport> {
        if records.is_empty() {
            return None;
        }
        Some(CsvExport::new(records, stem, date))
    }

    /// Full roster in stored order.
    pub fn export_roster(&self) -> Option<CsvExport> {
        self.export_csv(self.store.records(), FULL_ROSTER_STEM)
    }

    /// Current report, in report order.
    pub fn export_report(&self) -> Option<CsvExport> {
        let report = self.report();
        self.export_csv(&report.records(), &report.kind.export_stem())
    }
}
