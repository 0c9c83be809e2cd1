use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::evaluation::catalog::{Grade, Position, SkillAxis};
use crate::evaluation::domain::{EvaluationRecord, PlayerDraft, PlayerId, SkillScores};
use crate::evaluation::service::{EvaluationService, SubmitOutcome};
use crate::evaluation::store::{MemoryBlob, RosterBlob, StoreError};
use crate::evaluation::{roster_router, SharedService};

pub(super) fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Scores spread so that the total equals `total` (at most 70).
pub(super) fn scores_totalling(total: u32) -> SkillScores {
    let mut remaining = total;
    let mut scores = SkillScores::zeroed();
    for axis in SkillAxis::ordered() {
        let score = remaining.min(10) as u8;
        scores.set(axis, score);
        remaining -= u32::from(score);
    }
    scores
}

pub(super) fn draft(first: &str, last: &str, number: &str) -> PlayerDraft {
    PlayerDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        number: number.to_string(),
        ..PlayerDraft::new()
    }
}

pub(super) fn scored_draft(
    first: &str,
    last: &str,
    grade: Option<Grade>,
    position: Option<Position>,
    total: u32,
) -> PlayerDraft {
    PlayerDraft {
        grade,
        position,
        skills: scores_totalling(total),
        ..draft(first, last, "1")
    }
}

/// A record with a fixed id, bypassing the service.
pub(super) fn record(id: u64, draft: PlayerDraft) -> EvaluationRecord {
    EvaluationRecord::from_draft(draft, PlayerId(id), evaluated_at())
}

pub(super) fn build_service() -> (EvaluationService<MemoryBlob>, MemoryBlob) {
    let blob = MemoryBlob::default();
    (EvaluationService::open(blob.clone()), blob)
}

pub(super) fn add(service: &mut EvaluationService<MemoryBlob>, draft: PlayerDraft) -> PlayerId {
    match service.submit(draft).expect("submission accepted") {
        SubmitOutcome::Created(record) => record.id(),
        SubmitOutcome::Updated(_) => panic!("expected a new player"),
    }
}

pub(super) fn shared(service: EvaluationService<MemoryBlob>) -> SharedService<MemoryBlob> {
    Arc::new(Mutex::new(service))
}

pub(super) fn router_with_service(service: EvaluationService<MemoryBlob>) -> axum::Router {
    roster_router(shared(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}

/// Accepts reads but refuses every write.
#[derive(Debug, Default, Clone)]
pub(super) struct ReadOnlyBlob;

impl RosterBlob for ReadOnlyBlob {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn write(&self, _contents: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "roster is read-only",
        )))
    }
}
