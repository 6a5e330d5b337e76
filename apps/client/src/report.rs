//! Terminal rendering of a `ResultsView`.

use std::fmt::Write;

use crate::analysis::{ResultsView, ScoreAccent};

const BAR_WIDTH: usize = 30;

fn paint(text: &str, accent: ScoreAccent, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    let code = match accent {
        ScoreAccent::Green => "32",
        ScoreAccent::Yellow => "33",
        ScoreAccent::Red => "31",
    };
    format!("\x1b[1;{code}m{text}\x1b[0m")
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(filled)
}

/// Renders the summary, charts and (when `show_details`) the four skill lists.
pub fn render(view: &ResultsView, show_details: bool, color: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Analysis Results");
    let _ = writeln!(out, "================");
    let headline = paint(&format!("{}%", view.score), view.accent, color);
    let _ = writeln!(out, "Your Resume Match Score: {headline}  {}", view.label);
    if let Some(at) = view.analyzed_at {
        let _ = writeln!(out, "Analyzed at {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    let chart = &view.chart;
    let max = chart
        .resume_skills
        .max(chart.jd_skills)
        .max(chart.matched_skills);
    let _ = writeln!(out, "\nSkills Comparison");
    for (label, count) in [
        ("Resume", chart.resume_skills),
        ("Job Description", chart.jd_skills),
        ("Matched", chart.matched_skills),
    ] {
        let _ = writeln!(out, "  {label:<16} {count:>3} {}", bar(count, max));
    }

    let breakdown = &view.breakdown;
    let _ = writeln!(out, "\nMatch Breakdown");
    match breakdown.matched_percent() {
        Some(pct) => {
            let _ = writeln!(
                out,
                "  Matched {} / Missing {} ({pct:.0}% matched)",
                breakdown.matched, breakdown.missing
            );
        }
        None => {
            let _ = writeln!(out, "  No job-description skills to compare");
        }
    }

    if show_details {
        let _ = writeln!(out, "\nDetailed Skill Breakdown");
        for category in &view.categories {
            let _ = writeln!(out, "\n  {}", category.title);
            if category.skills.is_empty() {
                let _ = writeln!(out, "    No skills found");
            }
            for skill in &category.skills {
                let _ = writeln!(out, "    • {skill}");
            }
        }
    } else {
        let _ = writeln!(out, "\n(use `details` to view the detailed skill breakdown)");
    }

    out
}
