use super::catalog::{SkillAxis, MAX_SCORE};
use super::domain::{EvaluationRecord, PlayerDraft, SkillScores};
use serde::Serialize;

/// Highest total any player can reach.
pub const MAX_TOTAL: u32 = MAX_SCORE as u32 * SkillAxis::COUNT as u32;

/// A `potential` score at or above this marks a high-potential player.
pub const HIGH_POTENTIAL_THRESHOLD: u8 = 8;

/// Unweighted sum over the catalog axes.
pub fn total_score(skills: &SkillScores) -> u32 {
    skills.values().map(u32::from).sum()
}

pub fn average_score(skills: &SkillScores) -> f64 {
    f64::from(total_score(skills)) / SkillAxis::COUNT as f64
}

/// Anything carrying skill scores can be totalled. Scores are always derived
/// on demand and never stored next to the skills.
pub trait Scored {
    fn skills(&self) -> &SkillScores;

    fn total_score(&self) -> u32 {
        total_score(self.skills())
    }

    fn average_score(&self) -> f64 {
        average_score(self.skills())
    }

    fn is_high_potential(&self) -> bool {
        self.skills().get(SkillAxis::Potential) >= HIGH_POTENTIAL_THRESHOLD
    }
}

impl Scored for EvaluationRecord {
    fn skills(&self) -> &SkillScores {
        &self.skills
    }
}

impl Scored for PlayerDraft {
    fn skills(&self) -> &SkillScores {
        &self.skills
    }
}

/// Display band for a single skill score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Unrated,
    Developing,
    Solid,
    Elite,
}

impl ScoreTier {
    pub const fn for_score(score: u8) -> Self {
        match score {
            8.. => Self::Elite,
            5..=7 => Self::Solid,
            1..=4 => Self::Developing,
            0 => Self::Unrated,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unrated => "Unrated",
            Self::Developing => "Developing",
            Self::Solid => "Solid",
            Self::Elite => "Elite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_the_plain_axis_sum() {
        let skills = SkillScores::zeroed()
            .with(SkillAxis::Hitting, 7)
            .with(SkillAxis::Serving, 5)
            .with(SkillAxis::Potential, 9);
        assert_eq!(total_score(&skills), 21);
        assert!((average_score(&skills) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn totals_stay_within_catalog_bounds() {
        assert_eq!(total_score(&SkillScores::zeroed()), 0);

        let maxed = SkillAxis::ordered()
            .into_iter()
            .fold(SkillScores::zeroed(), |skills, axis| skills.with(axis, 10));
        assert_eq!(total_score(&maxed), MAX_TOTAL);
        assert_eq!(MAX_TOTAL, 70);
    }

    #[test]
    fn draft_total_tracks_live_edits() {
        let mut draft = PlayerDraft::new();
        assert_eq!(draft.total_score(), 0);
        draft.skills.set(SkillAxis::Defense, 4);
        draft.skills.set(SkillAxis::Potential, 8);
        assert_eq!(draft.total_score(), 12);
        assert!(draft.is_high_potential());
    }

    #[test]
    fn tiers_follow_slider_bands() {
        assert_eq!(ScoreTier::for_score(0), ScoreTier::Unrated);
        assert_eq!(ScoreTier::for_score(4), ScoreTier::Developing);
        assert_eq!(ScoreTier::for_score(5), ScoreTier::Solid);
        assert_eq!(ScoreTier::for_score(8), ScoreTier::Elite);
        assert_eq!(ScoreTier::for_score(10).label(), "Elite");
    }
}
