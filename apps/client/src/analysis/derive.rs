//! Results Derivation — side-effect-free aggregates over an `AnalysisResult`.
//!
//! Nothing here holds state: the same result always derives the same view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AnalysisResult;

/// Named score bracket. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreTier {
    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent Match",
            ScoreTier::Good => "Good Match",
            ScoreTier::Average => "Average Match",
            ScoreTier::Poor => "Poor Match",
        }
    }
}

/// Colour bucket for the headline score: ≥80 green, ≥60 yellow, otherwise red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAccent {
    Green,
    Yellow,
    Red,
}

impl ScoreAccent {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreAccent::Green
        } else if score >= 60.0 {
            ScoreAccent::Yellow
        } else {
            ScoreAccent::Red
        }
    }
}

/// Tiers cover every f64: anything not reaching a threshold (including NaN) is Poor.
pub fn classify_score(score: f64) -> ScoreTier {
    if score >= 80.0 {
        ScoreTier::Excellent
    } else if score >= 60.0 {
        ScoreTier::Good
    } else if score >= 40.0 {
        ScoreTier::Average
    } else {
        ScoreTier::Poor
    }
}

/// Bar-chart input: cardinalities only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub resume_skills: usize,
    pub jd_skills: usize,
    pub matched_skills: usize,
}

pub fn chart_series(result: &AnalysisResult) -> ChartSeries {
    ChartSeries {
        resume_skills: result.resume_skills.len(),
        jd_skills: result.jd_skills.len(),
        matched_skills: result.matched_skills.len(),
    }
}

/// Pie-chart input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchBreakdown {
    pub matched: usize,
    pub missing: usize,
}

impl MatchBreakdown {
    /// Share of the breakdown that matched, in percent. `None` when both counts are zero.
    pub fn matched_percent(&self) -> Option<f64> {
        let total = self.matched + self.missing;
        (total > 0).then(|| self.matched as f64 / total as f64 * 100.0)
    }
}

pub fn match_breakdown(result: &AnalysisResult) -> MatchBreakdown {
    MatchBreakdown {
        matched: result.matched_skills.len(),
        missing: result.missing_skills.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCategory {
    pub title: &'static str,
    pub skills: Vec<String>,
}

/// The four labelled lists, passed through unmodified.
pub fn categorize(result: &AnalysisResult) -> [SkillCategory; 4] {
    [
        SkillCategory {
            title: "Resume Skills",
            skills: result.resume_skills.clone(),
        },
        SkillCategory {
            title: "JD Skills",
            skills: result.jd_skills.clone(),
        },
        SkillCategory {
            title: "Matched Skills",
            skills: result.matched_skills.clone(),
        },
        SkillCategory {
            title: "Missing Skills",
            skills: result.missing_skills.clone(),
        },
    ]
}

/// Everything the report needs, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub score: f64,
    pub tier: ScoreTier,
    pub label: &'static str,
    pub accent: ScoreAccent,
    pub chart: ChartSeries,
    pub breakdown: MatchBreakdown,
    pub categories: [SkillCategory; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl ResultsView {
    pub fn derive(result: &AnalysisResult) -> Self {
        let tier = classify_score(result.score);
        Self {
            score: result.score,
            tier,
            label: tier.label(),
            accent: ScoreAccent::for_score(result.score),
            chart: chart_series(result),
            breakdown: match_breakdown(result),
            categories: categorize(result),
            analyzed_at: None,
        }
    }

    pub fn with_timestamp(mut self, analyzed_at: DateTime<Utc>) -> Self {
        self.analyzed_at = Some(analyzed_at);
        self
    }
}
