//! Player evaluations: the skill catalog, the record model, scoring, the
//! ranking engine behind both the roster view and reports, CSV transfer, and
//! the durable roster store.

pub mod catalog;
pub mod codec;
pub mod domain;
pub mod ranking;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{Grade, Position, SkillAxis, MAX_SCORE, MIN_SCORE};
pub use codec::{CodecError, CsvExport, ImportOutcome};
pub use domain::{
    EvaluationRecord, IdSequence, PlayerDraft, PlayerId, RequiredField, Roster, SkillScores,
    ValidationError,
};
pub use ranking::{
    picker_options, ranked_view, PickerOption, PickerOptions, RankingMode, SelectionFilter,
};
pub use report::{RankedEntry, Report, ReportKind};
pub use router::{roster_router, SharedService};
pub use scoring::{total_score, ScoreTier, Scored};
pub use service::{
    EvaluationService, ImportSummary, Notice, NoticeLevel, ServiceError, SubmitOutcome,
    ViewSettings,
};
pub use store::{FileBlob, MemoryBlob, RosterBlob, RosterStore, StoreError, ROSTER_BLOB_NAME};
