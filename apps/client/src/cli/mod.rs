//! Command-line surface: a one-shot `analyze` and an interactive `session`.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::controller::{AnalysisController, SubmitOutcome, WorkflowState};
use crate::intake::{InputSource, IntakeOutcome, SlotKind, UploadedFile};
use crate::report;

pub mod session;

#[derive(Parser)]
#[command(name = "resume-match", version, about = "Match a resume against a job description")]
pub struct Cli {
    /// Analysis endpoint (overrides ANALYZE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Fail on results that break the skill-set contract (overrides STRICT_SKILL_CONSISTENCY)
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one resume against one job description and print the results
    Analyze {
        /// Resume file (.pdf, .docx, .doc)
        #[arg(long)]
        resume: PathBuf,
        /// Job description file (.pdf, .docx, .doc)
        #[arg(long)]
        jd: PathBuf,
        /// Declared media type for the resume, instead of guessing from the extension
        #[arg(long)]
        resume_type: Option<String>,
        /// Declared media type for the job description
        #[arg(long)]
        jd_type: Option<String>,
        /// Include the detailed skill breakdown
        #[arg(long)]
        details: bool,
        /// Print the derived results as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: load documents, submit, retry, reset
    Session,
}

pub struct AnalyzeArgs<'a> {
    pub resume: &'a Path,
    pub jd: &'a Path,
    pub resume_type: Option<&'a str>,
    pub jd_type: Option<&'a str>,
    pub details: bool,
    pub json: bool,
}

/// Reads `path` into `kind`. A rejected file is reported to the user before returning.
pub async fn load_into_slot(
    controller: &mut AnalysisController,
    kind: SlotKind,
    path: &Path,
    declared: Option<&str>,
    source: InputSource,
    notices: &mut impl Write,
) -> Result<bool> {
    let file = UploadedFile::from_path(path, declared).await?;
    let name = file.file_name.clone();
    match controller.submit_file(kind, file, source) {
        IntakeOutcome::Accepted => Ok(true),
        IntakeOutcome::Rejected(reason) => {
            writeln!(notices, "{kind} '{name}' rejected: {reason}")?;
            Ok(false)
        }
        IntakeOutcome::Locked => {
            writeln!(notices, "{kind} '{name}' not loaded: {LOCKED_NOTICE}")?;
            Ok(false)
        }
    }
}

pub const LOCKED_NOTICE: &str = "results are showing; type `reset` to analyze another resume";

/// `main` prints errors as "Error: {e}", so the failure text must not carry its own prefix.
fn failure(message: &str) -> anyhow::Error {
    let message = message.strip_prefix("Error:").unwrap_or(message).trim_start();
    anyhow::anyhow!("{message}")
}

pub async fn run_analyze(
    controller: &mut AnalysisController,
    args: AnalyzeArgs<'_>,
) -> Result<()> {
    let mut stderr = std::io::stderr();
    let slots = [
        (SlotKind::Resume, args.resume, args.resume_type),
        (SlotKind::JobDescription, args.jd, args.jd_type),
    ];
    for (kind, path, declared) in slots {
        let source = InputSource::Picker;
        if !load_into_slot(controller, kind, path, declared, source, &mut stderr).await? {
            bail!("{kind} was not accepted");
        }
    }

    info!("Analyzing your documents...");
    match controller.submit().await {
        SubmitOutcome::Succeeded => {}
        SubmitOutcome::Failed(message) => return Err(failure(&message)),
        SubmitOutcome::Ignored => bail!("Both documents are required before analysis"),
    }

    let WorkflowState::Succeeded(done) = controller.state() else {
        bail!("Analysis finished without a result");
    };
    let view = done.view();

    let mut stdout = std::io::stdout();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &view)?;
        writeln!(stdout)?;
    } else {
        let color = stdout.is_terminal();
        write!(stdout, "{}", report::render(&view, args.details, color))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_drops_duplicate_error_prefix() {
        let err = failure("Error: could not reach the analysis service");
        assert_eq!(
            format!("Error: {err}"),
            "Error: could not reach the analysis service"
        );
    }

    #[test]
    fn test_failure_keeps_unprefixed_message() {
        let err = failure("Error: 503 Service Unavailable");
        assert_eq!(err.to_string(), "503 Service Unavailable");
        assert_eq!(failure("plain text").to_string(), "plain text");
    }
}
