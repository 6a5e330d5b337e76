//! Skill-match payload returned by the analysis service, plus the pure
//! derivations the report is built from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub mod derive;

pub use derive::{ResultsView, ScoreAccent};

/// Service response. Skill labels are opaque strings; list order is kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: f64,
}

impl AnalysisResult {
    /// Lists every way the payload breaks the service contract
    /// (`matched ⊆ jd`, `missing = jd − matched`, score in 0..=100).
    /// Empty when consistent.
    pub fn consistency_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            violations.push(format!("score {} is outside 0..=100", self.score));
        }

        let jd: HashSet<&str> = self.jd_skills.iter().map(String::as_str).collect();
        let matched: HashSet<&str> = self.matched_skills.iter().map(String::as_str).collect();
        let missing: HashSet<&str> = self.missing_skills.iter().map(String::as_str).collect();

        let stray_matched: Vec<&str> = self
            .matched_skills
            .iter()
            .map(String::as_str)
            .filter(|s| !jd.contains(s))
            .collect();
        if !stray_matched.is_empty() {
            violations.push(format!(
                "matched skills not in JD skills: {}",
                stray_matched.join(", ")
            ));
        }

        let expected_missing: HashSet<&str> = jd.difference(&matched).copied().collect();
        if expected_missing != missing {
            let mut unexpected: Vec<&str> =
                missing.difference(&expected_missing).copied().collect();
            let mut unreported: Vec<&str> =
                expected_missing.difference(&missing).copied().collect();
            unexpected.sort_unstable();
            unreported.sort_unstable();
            violations.push(format!(
                "missing skills differ from JD minus matched (unexpected: [{}], unreported: [{}])",
                unexpected.join(", "),
                unreported.join(", ")
            ));
        }

        violations
    }
}
