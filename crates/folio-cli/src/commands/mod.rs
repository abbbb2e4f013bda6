mod rank;
mod strategies;

use std::io;
use std::sync::Arc;

use folio_core::{
    BatchPacer, Envelope, IexCloudSource, IexConfig, MockSource, ProviderId, QuoteSource, Report,
    ReqwestHttpClient,
};
use serde_json::Value;

use crate::cli::{Cli, Command, SourceSelector};
use crate::error::CliError;
use crate::metadata::Metadata;

/// What a command produced, before it is wrapped in an envelope.
#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub report: Report,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
    pub source: Option<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, report: Report) -> Self {
        Self {
            data,
            report,
            warnings: Vec::new(),
            latency_ms: 0,
            source: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_source(mut self, source: ProviderId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Envelope for JSON output plus the report table/CSV renderers use.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub report: Report,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let result = match &cli.command {
        Command::Rank(args) => {
            let source = build_source(cli.source, cli.timeout_ms)?;
            let value = rank::resolve_portfolio_value(
                args.portfolio_value.as_deref(),
                io::stdin().lock(),
                io::stderr(),
            )?;
            rank::run(args, source, pacer_for(cli.source), value).await?
        }
        Command::Strategies => strategies::run()?,
    };

    into_output(result)
}

fn into_output(result: CommandResult) -> Result<CommandOutput, CliError> {
    let CommandResult {
        data,
        report,
        warnings,
        latency_ms,
        source,
    } = result;

    let mut metadata = Metadata::new(source, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Ok(CommandOutput {
        envelope: Envelope::success(meta, data),
        report,
    })
}

fn build_source(selector: SourceSelector, timeout_ms: u64) -> Result<Arc<dyn QuoteSource>, CliError> {
    match selector {
        SourceSelector::Mock => Ok(Arc::new(MockSource::default())),
        SourceSelector::Iex => {
            let config = IexConfig::from_env()?.with_timeout_ms(timeout_ms);
            tracing::debug!(base_url = config.base_url(), "using iex cloud");
            Ok(Arc::new(IexCloudSource::new(
                config,
                Arc::new(ReqwestHttpClient::new()),
            )))
        }
    }
}

fn pacer_for(selector: SourceSelector) -> BatchPacer {
    match selector {
        SourceSelector::Iex => BatchPacer::iex_default(),
        SourceSelector::Mock => BatchPacer::new(std::time::Duration::from_millis(1), 1_000),
    }
}
