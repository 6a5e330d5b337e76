//! Interactive session driving the controller from line commands.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::{load_into_slot, LOCKED_NOTICE};
use crate::controller::{AnalysisController, SubmitOutcome, WorkflowState};
use crate::intake::{InputSource, SlotKind};
use crate::report;

const HELP: &str = "\
Commands:
  resume <path>      load the resume (.pdf, .docx, .doc)
  jd <path>          load the job description
  clear resume|jd    remove a loaded document
  status             show loaded documents and workflow state
  submit             analyze the loaded documents
  details            show/hide the detailed skill breakdown
  retry              dismiss the error and submit again
  dismiss            dismiss the error, keeping the documents
  reset              start over with no documents
  help               show this help
  quit               leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Load {
        kind: SlotKind,
        path: PathBuf,
        source: InputSource,
    },
    Clear(SlotKind),
    Status,
    Submit,
    Details,
    Retry,
    Dismiss,
    Reset,
    Help,
    Quit,
}

/// Terminals paste dragged files as quoted paths; a quoted argument counts as a drop.
fn parse_path(raw: &str) -> Option<(PathBuf, InputSource)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for quote in ['\'', '"'] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|r| r.strip_suffix(quote))
        {
            return Some((PathBuf::from(inner), InputSource::Drop));
        }
    }
    Some((PathBuf::from(raw), InputSource::Picker))
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match word.to_ascii_lowercase().as_str() {
        "resume" | "jd" => {
            let kind = SlotKind::parse(word).ok_or_else(|| format!("unknown slot '{word}'"))?;
            let (path, source) =
                parse_path(rest).ok_or_else(|| format!("usage: {word} <path>"))?;
            Ok(SessionCommand::Load { kind, path, source })
        }
        "clear" => SlotKind::parse(rest)
            .map(SessionCommand::Clear)
            .ok_or_else(|| "usage: clear resume|jd".to_string()),
        "status" => Ok(SessionCommand::Status),
        "submit" | "analyze" => Ok(SessionCommand::Submit),
        "details" => Ok(SessionCommand::Details),
        "retry" => Ok(SessionCommand::Retry),
        "dismiss" => Ok(SessionCommand::Dismiss),
        "reset" => Ok(SessionCommand::Reset),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command '{other}' (type `help`)")),
    }
}

fn write_status(controller: &AnalysisController, out: &mut impl Write) -> Result<()> {
    for kind in [SlotKind::Resume, SlotKind::JobDescription] {
        match controller.intake().slot(kind).file() {
            Some(file) => writeln!(out, "{kind}: {} ({} bytes)", file.file_name, file.size())?,
            None => writeln!(out, "{kind}: (empty)")?,
        }
    }
    writeln!(out, "State: {}", controller.state().name())?;
    if controller.can_submit() {
        writeln!(out, "Ready to analyze (type `submit`)")?;
    }
    Ok(())
}

fn write_outcome(
    controller: &AnalysisController,
    outcome: &SubmitOutcome,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    match outcome {
        SubmitOutcome::Ignored => match controller.state() {
            WorkflowState::Idle => writeln!(out, "Load both a resume and a job description first")?,
            WorkflowState::Succeeded(_) => {
                writeln!(out, "Results are showing; type `reset` to analyze another resume")?
            }
            WorkflowState::Failed(_) => {
                writeln!(out, "Type `retry`, `dismiss` or `reset` to continue")?
            }
            WorkflowState::Submitting { .. } => writeln!(out, "An analysis is already running")?,
        },
        SubmitOutcome::Succeeded => write_results(controller, color, out)?,
        SubmitOutcome::Failed(message) => {
            writeln!(out, "{message}")?;
            writeln!(
                out,
                "Type `retry` to try again, `dismiss` to keep your documents, or `reset`"
            )?;
        }
    }
    Ok(())
}

fn write_results(controller: &AnalysisController, color: bool, out: &mut impl Write) -> Result<()> {
    if let WorkflowState::Succeeded(done) = controller.state() {
        write!(out, "{}", report::render(&done.view(), controller.show_details(), color))?;
    }
    Ok(())
}

/// Applies one command. Returns `false` when the session should end.
pub async fn apply(
    controller: &mut AnalysisController,
    command: SessionCommand,
    color: bool,
    out: &mut impl Write,
) -> Result<bool> {
    match command {
        SessionCommand::Load { kind, path, source } => {
            match load_into_slot(controller, kind, &path, None, source, out).await {
                Ok(true) => writeln!(out, "{kind} loaded")?,
                Ok(false) => {}
                Err(e) => writeln!(out, "{e:#}")?,
            }
        }
        SessionCommand::Clear(kind) => {
            if controller.clear_slot(kind) {
                writeln!(out, "{kind} cleared")?;
            } else {
                writeln!(out, "{kind} not cleared: {LOCKED_NOTICE}")?;
            }
        }
        SessionCommand::Status => write_status(controller, out)?,
        SessionCommand::Submit => {
            if controller.can_submit() {
                writeln!(out, "Analyzing your documents...")?;
            }
            let outcome = controller.submit().await;
            write_outcome(controller, &outcome, color, out)?;
        }
        SessionCommand::Details => {
            let shown = controller.toggle_details();
            if matches!(controller.state(), WorkflowState::Succeeded(_)) {
                write_results(controller, color, out)?;
            } else {
                let word = if shown { "shown" } else { "hidden" };
                writeln!(out, "Detailed breakdown will be {word} with the next results")?;
            }
        }
        SessionCommand::Retry => {
            let outcome = controller.retry().await;
            write_outcome(controller, &outcome, color, out)?;
        }
        SessionCommand::Dismiss => {
            if controller.dismiss_error() {
                writeln!(out, "Error dismissed; your documents are still loaded")?;
            } else {
                writeln!(out, "No error to dismiss")?;
            }
        }
        SessionCommand::Reset => {
            if controller.reset() {
                writeln!(out, "Session reset")?;
            }
        }
        SessionCommand::Help => writeln!(out, "{HELP}")?,
        SessionCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands from `input` until EOF or `quit`.
pub async fn run<R: AsyncBufRead + Unpin>(
    controller: &mut AnalysisController,
    input: R,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Resume Match: type `help` for commands")?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !apply(controller, command, color, out).await? {
                    break;
                }
            }
            Err(msg) => writeln!(out, "{msg}")?,
        }
    }
    Ok(())
}
