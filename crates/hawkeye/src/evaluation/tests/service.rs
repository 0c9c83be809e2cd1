use super::common::*;
use chrono::NaiveDate;

use crate::evaluation::catalog::{Grade, Position, SkillAxis};
use crate::evaluation::domain::{PlayerDraft, PlayerId, RequiredField};
use crate::evaluation::ranking::{PickerOptions, RankingMode, SelectionFilter};
use crate::evaluation::report::ReportKind;
use crate::evaluation::scoring::Scored;
use crate::evaluation::service::{
    EvaluationService, NoticeLevel, ServiceError, SubmitOutcome,
};
use crate::evaluation::store::MemoryBlob;

#[test]
fn submit_creates_then_updates_in_place() {
    let (mut service, blob) = build_service();
    let first = service
        .submit(draft("Ava", "Smith", "12"))
        .expect("created");
    assert!(matches!(first, SubmitOutcome::Created(_)));
    assert_eq!(first.notice().message, "Player added successfully!");

    let id = first.record().id();
    let mut edit = service.draft_for(id).expect("draft loads");
    edit.skills.set(SkillAxis::Serving, 9);
    edit.number = "13".to_string();

    let second = service.submit(edit).expect("updated");
    assert!(matches!(second, SubmitOutcome::Updated(_)));
    assert_eq!(second.notice().message, "Evaluation updated!");
    assert_eq!(second.record().id(), id);

    assert_eq!(service.records().len(), 1);
    assert_eq!(service.records()[0].number, "13");
    assert_eq!(service.records()[0].total_score(), 9);
    assert!(blob.contents().expect("saved").contains("\"number\":\"13\""));
}

#[test]
fn new_players_go_to_the_front() {
    let (mut service, _) = build_service();
    add(&mut service, draft("Ava", "Smith", "12"));
    add(&mut service, draft("Mia", "Jones", "7"));

    let names: Vec<_> = service.records().iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, ["Jones", "Smith"]);
}

#[test]
fn invalid_draft_leaves_roster_unchanged() {
    let (mut service, blob) = build_service();
    add(&mut service, draft("Ava", "Smith", "12"));
    let saved = blob.contents();

    let err = service
        .submit(draft("  ", "Jones", ""))
        .expect_err("blank fields rejected");
    match &err {
        ServiceError::Validation(validation) => assert_eq!(
            validation.missing,
            [RequiredField::FirstName, RequiredField::Number]
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.notice().level, NoticeLevel::Error);
    assert_eq!(err.notice().message, "Please enter full name and jersey number");
    assert_eq!(service.records().len(), 1);
    assert_eq!(blob.contents(), saved);
}

#[test]
fn submit_with_unknown_id_is_rejected() {
    let (mut service, _) = build_service();
    let stale = PlayerDraft {
        id: Some(PlayerId(404)),
        ..draft("Ava", "Smith", "12")
    };

    let err = service.submit(stale).expect_err("unknown id rejected");
    assert!(matches!(err, ServiceError::UnknownPlayer(PlayerId(404))));
    assert!(service.records().is_empty());
}

#[test]
fn delete_unknown_id_is_a_no_op() {
    let (mut service, _) = build_service();
    let id = add(&mut service, draft("Ava", "Smith", "12"));

    assert!(!service.delete(PlayerId(id.0 + 1_000)).expect("delete succeeds"));
    assert_eq!(service.records().len(), 1);

    assert!(service.delete(id).expect("delete succeeds"));
    assert!(service.records().is_empty());
}

#[test]
fn reset_clears_every_record_and_the_blob() {
    let (mut service, blob) = build_service();
    add(&mut service, draft("Ava", "Smith", "12"));
    add(&mut service, draft("Mia", "Jones", "7"));

    service.reset_all().expect("reset succeeds");
    assert!(service.records().is_empty());
    assert_eq!(blob.contents().as_deref(), Some("[]"));
}

#[test]
fn view_settings_drive_roster_view_and_report() {
    let (mut service, _) = build_service();
    add(&mut service, scored_draft("Ava", "Smith", Some(Grade::Tenth), None, 40));
    add(&mut service, scored_draft("Mia", "Jones", Some(Grade::Eighth), None, 20));
    add(&mut service, scored_draft("Zoe", "Park", Some(Grade::Eighth), None, 60));

    let view = service.roster_view();
    assert_eq!(view[0].player.last_name, "Park");
    assert_eq!(view[0].rank, 1);

    service.set_sort_mode(RankingMode::Name);
    service.set_search_term("s");
    let names: Vec<_> = service
        .roster_view()
        .into_iter()
        .map(|entry| entry.player.last_name)
        .collect();
    assert_eq!(names, ["Jones", "Smith"]);

    service.set_search_term("");
    service.set_report_kind(ReportKind::Grade);
    let report = service.report();
    assert_eq!(report.kind, ReportKind::Grade);
    let order: Vec<_> = report.records().into_iter().map(|r| r.last_name).collect();
    assert_eq!(order, ["Park", "Jones", "Smith"]);
}

#[test]
fn picker_filters_by_position() {
    let (mut service, _) = build_service();
    add(&mut service, scored_draft("Ava", "Smith", None, Some(Position::Middle), 0));
    add(&mut service, scored_draft("Mia", "Jones", None, Some(Position::Setter), 0));

    match service.picker_options(&SelectionFilter::Position(Some(Position::Setter))) {
        PickerOptions::Players(options) => {
            assert_eq!(options.len(), 1);
            assert_eq!(options[0].label, "Jones, Mia (#1)");
        }
        other => panic!("unexpected picker state: {other:?}"),
    }
}

#[test]
fn import_prepends_new_players_with_fresh_ids() {
    let (mut service, _) = build_service();
    let existing = add(&mut service, draft("Ava", "Smith", "12"));

    let summary = service
        .import_csv("First Name,Last Name,Number\nJane,Doe,4\nKim,Lee,5\n")
        .expect("import succeeds");
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.notice().message, "Imported 2 players!");
    assert!(!summary.ids.contains(&existing));

    let names: Vec<_> = service.records().iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, ["Doe", "Lee", "Smith"]);
}

#[test]
fn import_without_rows_is_informational() {
    let (mut service, blob) = build_service();
    let summary = service
        .import_csv("First Name,Last Name\nJane,Doe\n")
        .expect("parses");
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.notice().level, NoticeLevel::Info);
    assert_eq!(summary.notice().message, "No valid player data found");
    assert!(blob.contents().is_none());
}

#[test]
fn import_skips_a_blank_first_line_as_the_header() {
    let (mut service, _) = build_service();
    let summary = service.import_csv("\nJane,Doe,4\n").expect("parses");
    assert_eq!(summary.imported, 1);
    assert_eq!(service.records()[0].first_name, "Jane");
}

#[test]
fn unreadable_import_changes_nothing() {
    let (mut service, _) = build_service();
    add(&mut service, draft("Ava", "Smith", "12"));

    let mut bytes = b"First Name,Last Name,Number\nJane,Doe,4\n".to_vec();
    bytes.extend_from_slice(b"\xff\xfe,Bad,5\n");
    let err = service.import_bytes(&bytes).expect_err("invalid utf-8");
    assert!(matches!(err, ServiceError::Codec(_)));
    assert_eq!(err.notice().message, "Failed to parse CSV file");
    assert_eq!(service.records().len(), 1);
}

#[test]
fn export_then_import_drops_skill_scores() {
    let (mut service, _) = build_service();
    add(
        &mut service,
        scored_draft("Ava", "Smith", Some(Grade::Eleventh), Some(Position::Outside), 55),
    );

    let export = service.export_roster().expect("roster has players");
    let (mut fresh, _) = build_service();
    fresh.import_csv(&export.body).expect("import succeeds");

    let restored = &fresh.records()[0];
    assert_eq!(restored.first_name, "Ava");
    assert_eq!(restored.grade, Some(Grade::Eleventh));
    assert_eq!(restored.position, Some(Position::Outside));
    assert_eq!(restored.total_score(), 0);
}

#[test]
fn exports_are_named_by_stem_and_date() {
    let (mut service, _) = build_service();
    add(&mut service, draft("Ava", "Smith", "12"));
    let date = NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date");

    let roster = service
        .export_csv_on(service.records(), "hawkeye_full_data", date)
        .expect("non-empty");
    assert_eq!(roster.file_name, "hawkeye_full_data_2025-09-24.csv");
    assert_eq!(roster.content_type, "text/csv");
    assert_eq!(roster.row_count, 1);

    service.set_report_kind(ReportKind::Position);
    let report = service.export_report().expect("non-empty report");
    assert!(report.file_name.starts_with("hawkeye_report_position_"));
}

#[test]
fn empty_lists_produce_no_export() {
    let (mut service, _) = build_service();
    assert!(service.export_roster().is_none());

    add(&mut service, draft("Ava", "Smith", "12"));
    service.set_search_term("nobody");
    assert!(service.export_report().is_none());
}

#[test]
fn write_failures_surface_as_store_errors() {
    let mut service = EvaluationService::open(ReadOnlyBlob);
    let err = service
        .submit(draft("Ava", "Smith", "12"))
        .expect_err("write refused");
    assert!(matches!(err, ServiceError::Store(_)));
    assert!(service.records().is_empty());
    assert!(service.roster_view().is_empty());
}

#[test]
fn reopened_service_sees_saved_roster() {
    let blob = MemoryBlob::default();
    let mut service = EvaluationService::open(blob.clone());
    let id = add(&mut service, draft("Ava", "Smith", "12"));

    let reopened = EvaluationService::open(blob);
    assert_eq!(reopened.records().len(), 1);
    assert_eq!(reopened.records()[0].id(), id);
}
