mod analysis;
mod cli;
mod config;
mod controller;
mod errors;
mod intake;
mod report;
mod service;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{AnalyzeArgs, Cli, Command};
use crate::config::Config;
use crate::controller::AnalysisController;
use crate::service::HttpAnalysisService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.url {
        config.analyze_url = url;
    }
    config.strict_consistency |= cli.strict;

    // Logs go to stderr so stdout carries only the report or JSON.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_match={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let service = HttpAnalysisService::new(config.analyze_url.clone(), config.request_timeout)?;
    info!(
        endpoint = service.endpoint(),
        timeout_secs = config.request_timeout.as_secs(),
        strict = config.strict_consistency,
        "Analysis client initialized"
    );

    let mut controller = AnalysisController::new(Arc::new(service), config.strict_consistency);

    match cli.command {
        Command::Analyze {
            resume,
            jd,
            resume_type,
            jd_type,
            details,
            json,
        } => {
            cli::run_analyze(
                &mut controller,
                AnalyzeArgs {
                    resume: &resume,
                    jd: &jd,
                    resume_type: resume_type.as_deref(),
                    jd_type: jd_type.as_deref(),
                    details,
                    json,
                },
            )
            .await
        }
        Command::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let color = stdout.is_terminal();
            cli::session::run(&mut controller, stdin, color, &mut stdout).await
        }
    }
}
