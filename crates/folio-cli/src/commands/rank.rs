use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use folio_core::{
    load_constituents, symbols_from_list, Allocation, BatchFetcher, BatchPacer, PortfolioValue,
    PositionSizer, QuoteSource, Ranker, Report, Selection, StrategyConfig, Symbol,
};
use serde::Serialize;
use tracing::info;

use crate::cli::RankArgs;
use crate::error::CliError;
use crate::prompt::read_portfolio_value;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RankResponseData<'a> {
    strategy: &'a StrategyConfig,
    portfolio_value: PortfolioValue,
    requested: usize,
    missing: &'a [Symbol],
    selection: &'a Selection,
    allocations: &'a [Allocation],
    report: &'a Report,
}

/// Uses `--portfolio-value` when given, otherwise prompts on `input`.
pub fn resolve_portfolio_value<R, W>(
    flag: Option<&str>,
    input: R,
    output: W,
) -> Result<PortfolioValue, CliError>
where
    R: BufRead,
    W: Write,
{
    match flag {
        Some(value) => Ok(PortfolioValue::parse(value)?),
        None => read_portfolio_value(input, output),
    }
}

pub async fn run(
    args: &RankArgs,
    source: Arc<dyn QuoteSource>,
    pacer: BatchPacer,
    portfolio_value: PortfolioValue,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();

    let symbols = match &args.constituents {
        Some(path) => load_constituents(path)?,
        None => symbols_from_list(&args.symbols)?,
    };

    let mut config = args.strategy.config();
    if let Some(top_n) = args.top_n {
        config = config.with_top_n(top_n)?;
    }

    let provider = source.id();
    let mut fetcher = BatchFetcher::new(source, pacer);
    if let Some(batch_size) = args.batch_size {
        fetcher = fetcher.with_batch_size(batch_size);
    }

    let outcome = fetcher.fetch(&symbols, &config.metric_keys()).await?;
    if outcome.universe.is_empty() && outcome.failed_batches > 0 {
        return Err(CliError::Source(format!(
            "all {} batches from {provider} failed: {}",
            outcome.batches,
            outcome.warnings.join("; ")
        )));
    }

    let selection = Ranker::new(config.clone()).rank(&outcome.universe)?;
    let allocations = PositionSizer::new(portfolio_value).size(&selection.entries)?;
    let report = Report::build(&config, &selection, &allocations);

    info!(
        strategy = %config.name,
        selected = selection.len(),
        portfolio_value = portfolio_value.get(),
        "portfolio sized"
    );

    let data = serde_json::to_value(RankResponseData {
        strategy: &config,
        portfolio_value,
        requested: symbols.len(),
        missing: &outcome.missing,
        selection: &selection,
        allocations: &allocations,
        report: &report,
    })?;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(CommandResult::ok(data, report)
        .with_warnings(outcome.warnings)
        .with_source(provider)
        .with_latency(latency_ms))
}
