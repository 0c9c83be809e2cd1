use super::domain::EvaluationRecord;
use super::ranking::{ranked_view, RankingMode};
use super::scoring::Scored;
use serde::{Deserialize, Serialize};

/// Named report slices offered on the reports screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Overall,
    Grade,
    Position,
}

impl ReportKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Overall, Self::Grade, Self::Position]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Grade => "grade",
            Self::Position => "position",
        }
    }

    pub const fn ranking_mode(self) -> RankingMode {
        match self {
            Self::Overall => RankingMode::Score,
            Self::Grade => RankingMode::Grade,
            Self::Position => RankingMode::Position,
        }
    }

    pub const fn caption(self) -> &'static str {
        match self {
            Self::Overall => "Highest Score to Lowest",
            Self::Grade => "Ranked by Grade (7-12), then Score",
            Self::Position => "Ranked by Position (A-Z), then Score",
        }
    }

    /// Base name of the exported CSV, before the date suffix.
    pub fn export_stem(self) -> String {
        format!("hawkeye_report_{}", self.key())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(wanted))
    }
}

/// A ranked row with its derived scores, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub player: EvaluationRecord,
    pub total_score: u32,
    pub average_score: f64,
    pub high_potential: bool,
}

impl RankedEntry {
    pub fn number_all(records: Vec<EvaluationRecord>) -> Vec<Self> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, player)| Self {
                rank: index + 1,
                total_score: player.total_score(),
                average_score: player.average_score(),
                high_potential: player.is_high_potential(),
                player,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub caption: &'static str,
    pub entries: Vec<RankedEntry>,
}

impl Report {
    pub fn build(records: &[EvaluationRecord], kind: ReportKind, search_term: &str) -> Self {
        let ranked = ranked_view(records, kind.ranking_mode(), search_term);
        Self {
            kind,
            caption: kind.caption(),
            entries: RankedEntry::number_all(ranked),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in report order, as handed to the CSV exporter.
    pub fn records(&self) -> Vec<EvaluationRecord> {
        self.entries
            .iter()
            .map(|entry| entry.player.clone())
            .collect()
    }
}
