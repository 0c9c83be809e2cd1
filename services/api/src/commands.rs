use crate::infra::{parse_grade, parse_position, parse_report_kind, parse_score};
use clap::Args;
use hawkeye::error::AppError;
use hawkeye::evaluation::scoring::MAX_TOTAL;
use hawkeye::evaluation::{
    CsvExport, EvaluationRecord, EvaluationService, Grade, Notice, NoticeLevel, PickerOptions,
    PlayerDraft, PlayerId, Position, RankedEntry, RankingMode, Report, ReportKind, RosterBlob,
    ScoreTier, Scored, SelectionFilter, ServiceError, SkillAxis,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct AddArgs {
    /// Update the player with this id instead of adding a new one
    #[arg(long)]
    pub(crate) id: Option<u64>,
    #[arg(long)]
    pub(crate) first: Option<String>,
    #[arg(long)]
    pub(crate) last: Option<String>,
    /// Jersey number
    #[arg(long)]
    pub(crate) number: Option<String>,
    /// Grade from 7 to 12
    #[arg(long, value_parser = parse_grade)]
    pub(crate) grade: Option<Grade>,
    /// Outside, Middle, Right Side, Setter or Libero/DS
    #[arg(long, value_parser = parse_position)]
    pub(crate) position: Option<Position>,
    /// Skill score as AXIS=SCORE (0-10); repeat for each skill
    #[arg(long = "score", value_parser = parse_score)]
    pub(crate) scores: Vec<(SkillAxis, u8)>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// score, name, grade or position
    #[arg(long, default_value = "score")]
    pub(crate) sort: String,
    /// Only show players whose name or number contains this text
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Print every skill score under each player
    #[arg(long)]
    pub(crate) detail: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PickerArgs {
    #[arg(long, value_parser = parse_grade, conflicts_with = "position")]
    pub(crate) grade: Option<Grade>,
    #[arg(long, value_parser = parse_position)]
    pub(crate) position: Option<Position>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// overall, grade or position
    #[arg(value_parser = parse_report_kind, default_value = "overall")]
    pub(crate) kind: ReportKind,
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Also write the report as CSV into this directory
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Directory the CSV is written to
    #[arg(long, default_value = ".")]
    pub(crate) out: PathBuf,
}

pub(crate) fn run_add<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    args: AddArgs,
) -> Result<(), AppError> {
    let draft = build_draft(service, args)?;
    let outcome = service.submit(draft)?;
    println!("{}", render_notice(&outcome.notice()));
    println!("{}", render_player(outcome.record()));
    Ok(())
}

pub(crate) fn run_delete<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    id: u64,
) -> Result<(), AppError> {
    if service.delete(PlayerId(id))? {
        println!("{}", render_notice(&Notice::success("Player deleted.")));
    } else {
        println!("No player with id {id}; roster unchanged.");
    }
    Ok(())
}

pub(crate) fn run_reset<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    confirmed: bool,
) -> Result<(), AppError> {
    if !confirmed {
        println!(
            "This deletes all {} players. Re-run with --yes to confirm.",
            service.records().len()
        );
        return Ok(());
    }
    service.reset_all()?;
    println!("{}", render_notice(&Notice::success("All data cleared.")));
    Ok(())
}

pub(crate) fn run_list<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    args: ListArgs,
) -> Result<(), AppError> {
    service.set_sort_mode(RankingMode::parse_or_default(&args.sort));
    service.set_search_term(args.search);
    println!(
        "Roster ({} players, sorted by {})",
        service.records().len(),
        service.view_settings().sort_mode.key()
    );
    print!("{}", render_table(&service.roster_view(), args.detail));
    Ok(())
}

pub(crate) fn run_picker<B: RosterBlob>(
    service: &EvaluationService<B>,
    args: PickerArgs,
) -> Result<(), AppError> {
    let filter = match (args.grade, args.position) {
        (Some(grade), _) => SelectionFilter::Grade(Some(grade)),
        (None, Some(position)) => SelectionFilter::Position(Some(position)),
        (None, None) => SelectionFilter::All,
    };
    print!("{}", render_picker(&service.picker_options(&filter)));
    Ok(())
}

pub(crate) fn run_report<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    args: ReportArgs,
) -> Result<(), AppError> {
    service.set_report_kind(args.kind);
    service.set_search_term(args.search);
    print!("{}", render_report(&service.report()));

    if let Some(dir) = args.out {
        match service.export_report() {
            Some(export) => {
                let path = write_export(&dir, &export)?;
                println!("Saved {}", path.display());
            }
            None => println!("Nothing to export."),
        }
    }
    Ok(())
}

pub(crate) fn run_import<B: RosterBlob>(
    service: &mut EvaluationService<B>,
    path: &Path,
) -> Result<(), AppError> {
    match service.import_file(path) {
        Ok(summary) => {
            println!("{}", render_notice(&summary.notice()));
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", render_notice(&err.notice()));
            Err(err.into())
        }
    }
}

pub(crate) fn run_export<B: RosterBlob>(
    service: &EvaluationService<B>,
    args: ExportArgs,
) -> Result<(), AppError> {
    match service.export_roster() {
        Some(export) => {
            let path = write_export(&args.out, &export)?;
            println!("Saved {} players to {}", export.row_count, path.display());
        }
        None => println!("Nothing to export."),
    }
    Ok(())
}

/// Starts from the stored player when `--id` is given, then applies the
/// flags that were passed.
pub(crate) fn build_draft<B: RosterBlob>(
    service: &EvaluationService<B>,
    args: AddArgs,
) -> Result<PlayerDraft, ServiceError> {
    let mut draft = match args.id.map(PlayerId) {
        Some(id) => service
            .draft_for(id)
            .ok_or(ServiceError::UnknownPlayer(id))?,
        None => PlayerDraft::new(),
    };

    if let Some(first) = args.first {
        draft.first_name = first;
    }
    if let Some(last) = args.last {
        draft.last_name = last;
    }
    if let Some(number) = args.number {
        draft.number = number;
    }
    if args.grade.is_some() {
        draft.grade = args.grade;
    }
    if args.position.is_some() {
        draft.position = args.position;
    }
    for (axis, score) in args.scores {
        draft.skills.set(axis, score);
    }
    Ok(draft)
}

pub(crate) fn write_export(dir: &Path, export: &CsvExport) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&export.file_name);
    fs::write(&path, &export.body)?;
    info!(path = %path.display(), rows = export.row_count, "csv written");
    Ok(path)
}

fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{marker}] {}", notice.message)
}

fn grade_cell(grade: Option<Grade>) -> &'static str {
    grade.map(Grade::label).unwrap_or("-")
}

fn position_cell(position: Option<Position>) -> &'static str {
    position.map(Position::label).unwrap_or("-")
}

pub(crate) fn render_player(player: &EvaluationRecord) -> String {
    let mut lines = vec![format!(
        "{} (#{}) id {} | grade {} | {}",
        player.display_name(),
        player.number,
        player.id(),
        grade_cell(player.grade),
        position_cell(player.position)
    )];
    lines.extend(player.skills.iter().map(|(axis, score)| skill_line(axis, score)));
    lines.push(format!(
        "  {:<22} {:>2}/{MAX_TOTAL}",
        "Total",
        player.total_score()
    ));
    lines.join("\n")
}

fn skill_line(axis: SkillAxis, score: u8) -> String {
    format!(
        "  {:<22} {:>2}  {}",
        axis.label(),
        score,
        ScoreTier::for_score(score).label()
    )
}

pub(crate) fn render_table(entries: &[RankedEntry], detail: bool) -> String {
    if entries.is_empty() {
        return "No players found.\n".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<26} {:>4}  {:>5}  {:<10}  {:>5}  {:>5}\n",
        "Rank", "Player", "#", "Grade", "Position", "Total", "Avg"
    );
    for entry in entries {
        let player = &entry.player;
        out.push_str(&format!(
            "{:>4}  {:<26} {:>4}  {:>5}  {:<10}  {:>5}  {:>5.2}{}\n",
            entry.rank,
            player.display_name(),
            player.number,
            grade_cell(player.grade),
            position_cell(player.position),
            entry.total_score,
            entry.average_score,
            if entry.high_potential { "  high potential" } else { "" }
        ));
        if detail {
            for (axis, score) in player.skills.iter() {
                out.push_str("      ");
                out.push_str(&skill_line(axis, score));
                out.push('\n');
            }
        }
    }
    out
}

pub(crate) fn render_report(report: &Report) -> String {
    let mut out = format!(
        "{} report: {}\n",
        match report.kind {
            ReportKind::Overall => "Overall",
            ReportKind::Grade => "Grade",
            ReportKind::Position => "Position",
        },
        report.caption
    );
    out.push_str(&render_table(&report.entries, false));
    out
}

pub(crate) fn render_picker(options: &PickerOptions) -> String {
    match options {
        PickerOptions::AwaitingSelection => "Choose a grade or position first.\n".to_string(),
        PickerOptions::Empty => "No players match.\n".to_string(),
        PickerOptions::Players(options) => options
            .iter()
            .map(|option| format!("{:>15}  {}\n", option.id.0, option.label))
            .collect(),
    }
}
