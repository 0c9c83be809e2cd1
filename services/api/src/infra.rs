use hawkeye::config::StorageConfig;
use hawkeye::evaluation::{
    EvaluationService, FileBlob, Grade, Position, ReportKind, SkillAxis, MAX_SCORE,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_roster(storage: &StorageConfig) -> EvaluationService<FileBlob> {
    EvaluationService::open(storage.roster_blob())
}

/// Parses `axis=value`, e.g. `hitting=8`.
pub(crate) fn parse_score(raw: &str) -> Result<(SkillAxis, u8), String> {
    let (axis, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected AXIS=SCORE, got '{raw}'"))?;
    let axis = SkillAxis::from_id(axis.trim()).ok_or_else(|| {
        let known: Vec<&str> = SkillAxis::ordered().into_iter().map(SkillAxis::id).collect();
        format!("unknown skill '{}' (expected one of {})", axis.trim(), known.join(", "))
    })?;
    let value: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("score for {} must be a whole number", axis.id()))?;
    if value > MAX_SCORE {
        return Err(format!("score for {} must be at most {MAX_SCORE}", axis.id()));
    }
    Ok((axis, value))
}

pub(crate) fn parse_grade(raw: &str) -> Result<Grade, String> {
    raw.parse::<Grade>().map_err(|err| err.to_string())
}

pub(crate) fn parse_position(raw: &str) -> Result<Position, String> {
    raw.parse::<Position>().map_err(|err| err.to_string())
}

pub(crate) fn parse_report_kind(raw: &str) -> Result<ReportKind, String> {
    ReportKind::parse(raw).ok_or_else(|| {
        format!("unknown report '{raw}' (expected overall, grade or position)")
    })
}
