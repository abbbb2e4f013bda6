mod cli;
mod commands;
mod error;
mod metadata;
mod output;
mod prompt;

use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let output = commands::run(&cli).await?;
    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            output::render(&output, cli.format, cli.pretty, &mut writer)?;
            tracing::info!(path = %path.display(), rows = output.report.rows.len(), "report written");
        }
        None => output::render(&output, cli.format, cli.pretty, &mut io::stdout().lock())?,
    }

    let meta = &output.envelope.meta;
    if cli.strict && (!meta.warnings.is_empty() || !output.envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: meta.warnings.len(),
            error_count: output.envelope.errors.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
