use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::catalog::{Grade, Position};
use super::codec::CsvExport;
use super::domain::{PlayerDraft, PlayerId};
use super::ranking::{RankingMode, SelectionFilter};
use super::report::ReportKind;
use super::service::{EvaluationService, Notice, ServiceError, SubmitOutcome};
use super::store::RosterBlob;

/// The service behind a lock: every request runs to completion before the
/// next one touches the roster.
pub type SharedService<B> = Arc<Mutex<EvaluationService<B>>>;

/// `sort` sticks between requests; `search` applies to this request only.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RosterQuery {
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PickerQuery {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl PickerQuery {
    fn filter(&self) -> SelectionFilter {
        let value = self
            .value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match self.mode.as_deref().map(str::trim) {
            Some("grade") => SelectionFilter::Grade(value.and_then(|v| v.parse::<Grade>().ok())),
            Some("position") => {
                SelectionFilter::Position(value.and_then(|v| v.parse::<Position>().ok()))
            }
            _ => SelectionFilter::All,
        }
    }
}

/// Router exposing the presentation boundary over HTTP.
pub fn roster_router<B>(service: SharedService<B>) -> Router
where
    B: RosterBlob + 'static,
{
    Router::new()
        .route(
            "/api/v1/players",
            get(roster_handler::<B>)
                .post(submit_handler::<B>)
                .delete(reset_handler::<B>),
        )
        .route(
            "/api/v1/players/:player_id",
            get(draft_handler::<B>).delete(delete_handler::<B>),
        )
        .route("/api/v1/picker", get(picker_handler::<B>))
        .route("/api/v1/reports/:kind", get(report_handler::<B>))
        .route("/api/v1/reports/:kind/export", get(report_export_handler::<B>))
        .route("/api/v1/roster/export", get(roster_export_handler::<B>))
        .route("/api/v1/roster/import", post(import_handler::<B>))
        .with_state(service)
}

fn with_service<B, F>(service: &SharedService<B>, action: F) -> Response
where
    B: RosterBlob,
    F: FnOnce(&mut EvaluationService<B>) -> Response,
{
    match service.lock() {
        Ok(mut guard) => action(&mut guard),
        Err(_) => {
            let payload = json!({ "error": "roster unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) fn error_response(error: ServiceError) -> Response {
    AppError::from(error).into_response()
}

fn csv_response(export: Option<CsvExport>) -> Response {
    match export {
        Some(export) => {
            let disposition = format!("attachment; filename=\"{}\"", export.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, export.content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.body,
            )
                .into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub(crate) async fn roster_handler<B>(
    State(service): State<SharedService<B>>,
    Query(query): Query<RosterQuery>,
) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| {
        if let Some(sort) = query.sort.as_deref() {
            service.set_sort_mode(RankingMode::parse_or_default(sort));
        }
        service.set_search_term(query.search.unwrap_or_default());
        let payload = json!({
            "view": service.view_settings(),
            "players": service.roster_view(),
        });
        (StatusCode::OK, axum::Json(payload)).into_response()
    })
}

pub(crate) async fn submit_handler<B>(
    State(service): State<SharedService<B>>,
    axum::Json(draft): axum::Json<PlayerDraft>,
) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| match service.submit(draft) {
        Ok(outcome) => {
            let status = match outcome {
                SubmitOutcome::Created(_) => StatusCode::CREATED,
                SubmitOutcome::Updated(_) => StatusCode::OK,
            };
            let payload = json!({
                "player": outcome.record(),
                "notice": outcome.notice(),
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    })
}

pub(crate) async fn draft_handler<B>(
    State(service): State<SharedService<B>>,
    Path(player_id): Path<u64>,
) -> Response
where
    B: RosterBlob + 'static,
{
    let id = PlayerId(player_id);
    with_service(&service, |service| match service.draft_for(id) {
        Some(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        None => error_response(ServiceError::UnknownPlayer(id)),
    })
}

pub(crate) async fn delete_handler<B>(
    State(service): State<SharedService<B>>,
    Path(player_id): Path<u64>,
) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| match service.delete(PlayerId(player_id)) {
        Ok(removed) => {
            let payload = json!({
                "removed": removed,
                "notice": Notice::success("Player deleted."),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    })
}

pub(crate) async fn reset_handler<B>(State(service): State<SharedService<B>>) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| match service.reset_all() {
        Ok(()) => {
            let payload = json!({
                "notice": Notice::success("All data cleared."),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    })
}

pub(crate) async fn picker_handler<B>(
    State(service): State<SharedService<B>>,
    Query(query): Query<PickerQuery>,
) -> Response
where
    B: RosterBlob + 'static,
{
    let filter = query.filter();
    with_service(&service, |service| {
        let payload = json!({
            "mode": filter.key(),
            "picker": service.picker_options(&filter),
        });
        (StatusCode::OK, axum::Json(payload)).into_response()
    })
}

fn report_kind(raw: &str) -> Result<ReportKind, Response> {
    ReportKind::parse(raw).ok_or_else(|| {
        let payload = json!({ "error": format!("unknown report type '{raw}'") });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    })
}

pub(crate) async fn report_handler<B>(
    State(service): State<SharedService<B>>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    B: RosterBlob + 'static,
{
    let kind = match report_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    with_service(&service, |service| {
        service.set_report_kind(kind);
        service.set_search_term(query.search.unwrap_or_default());
        (StatusCode::OK, axum::Json(service.report())).into_response()
    })
}

pub(crate) async fn report_export_handler<B>(
    State(service): State<SharedService<B>>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    B: RosterBlob + 'static,
{
    let kind = match report_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    with_service(&service, |service| {
        service.set_report_kind(kind);
        service.set_search_term(query.search.unwrap_or_default());
        csv_response(service.export_report())
    })
}

pub(crate) async fn roster_export_handler<B>(State(service): State<SharedService<B>>) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| csv_response(service.export_roster()))
}

pub(crate) async fn import_handler<B>(
    State(service): State<SharedService<B>>,
    body: Bytes,
) -> Response
where
    B: RosterBlob + 'static,
{
    with_service(&service, |service| match service.import_bytes(&body) {
        Ok(summary) => {
            let status = if summary.imported == 0 {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            let payload = json!({
                "imported": summary.imported,
                "ids": summary.ids,
                "notice": summary.notice(),
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    })
}
