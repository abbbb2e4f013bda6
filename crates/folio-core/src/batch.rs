use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data_source::{BatchRequest, QuoteSource, SourceError};
use crate::throttling::BatchPacer;
use crate::{MetricKey, ProviderId, QuoteRecord, RankingError, Symbol, Universe};

/// What a fetch run produced, including everything it had to skip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub source: ProviderId,
    pub universe: Universe,
    /// Symbols requested but absent from the universe.
    pub missing: Vec<Symbol>,
    pub warnings: Vec<String>,
    pub batches: usize,
    pub failed_batches: usize,
}

/// Splits a symbol list into source-sized batches and assembles the replies
/// into a [`Universe`].
///
/// Batches run one after another, each waiting on the pacer first. A failed
/// batch makes its symbols absent and adds a warning; malformed records are
/// skipped the same way. Nothing is retried.
#[derive(Clone)]
pub struct BatchFetcher {
    source: Arc<dyn QuoteSource>,
    pacer: BatchPacer,
    batch_size: usize,
}

impl BatchFetcher {
    pub fn new(source: Arc<dyn QuoteSource>, pacer: BatchPacer) -> Self {
        let batch_size = source.max_batch_size().max(1);
        Self {
            source,
            pacer,
            batch_size,
        }
    }

    /// Uses smaller batches than the source allows. Never larger.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, self.source.max_batch_size().max(1));
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn fetch(
        &self,
        symbols: &[Symbol],
        metrics: &[MetricKey],
    ) -> Result<FetchOutcome, RankingError> {
        let source = self.source.id();
        let mut warnings = Vec::new();
        let mut records = Vec::with_capacity(symbols.len());
        let mut seen = HashSet::with_capacity(symbols.len());
        let mut failed_batches = 0;

        let chunks = symbols.chunks(self.batch_size).collect::<Vec<_>>();
        info!(
            %source,
            symbols = symbols.len(),
            batches = chunks.len(),
            "fetching quotes"
        );

        for (index, chunk) in chunks.iter().enumerate() {
            self.pacer.ready().await;

            let outcome = match BatchRequest::new(chunk.to_vec(), metrics.to_vec()) {
                Ok(request) => self.source.fetch(request).await,
                Err(error) => Err(error),
            };

            let batch = match outcome {
                Ok(batch) => batch,
                Err(error) => {
                    failed_batches += 1;
                    warn!(%source, batch = index + 1, code = error.code(), "batch failed");
                    warnings.push(batch_warning(index, chunk.len(), &error));
                    continue;
                }
            };

            debug!(%source, batch = index + 1, quotes = batch.quotes.len(), "batch fetched");

            for quote in batch.quotes {
                if !chunk.contains(&quote.symbol) {
                    warnings.push(format!(
                        "{source} returned unrequested symbol '{}'; ignored",
                        quote.symbol
                    ));
                    continue;
                }
                if !seen.insert(quote.symbol.clone()) {
                    warnings.push(format!(
                        "{source} returned '{}' more than once; kept the first",
                        quote.symbol
                    ));
                    continue;
                }

                match QuoteRecord::new(quote.symbol.as_str(), quote.price, quote.metrics) {
                    Ok(record) => records.push(record),
                    Err(error) => {
                        warn!(%source, symbol = %quote.symbol, "skipping malformed record");
                        warnings.push(format!("skipped: {error}"));
                    }
                }
            }
        }

        let present = records
            .iter()
            .map(|record| record.symbol().clone())
            .collect::<HashSet<_>>();
        let missing = symbols
            .iter()
            .filter(|symbol| !present.contains(*symbol))
            .cloned()
            .collect::<Vec<_>>();

        if !missing.is_empty() {
            warnings.push(format!(
                "{} of {} symbols have no data from {source}",
                missing.len(),
                symbols.len()
            ));
        }

        let universe = Universe::new(records)?;
        info!(
            %source,
            records = universe.len(),
            missing = missing.len(),
            failed_batches,
            "universe assembled"
        );

        Ok(FetchOutcome {
            source,
            universe,
            missing,
            warnings,
            batches: chunks.len(),
            failed_batches,
        })
    }
}

impl std::fmt::Debug for BatchFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchFetcher")
            .field("source", &self.source.id())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

fn batch_warning(index: usize, size: usize, error: &SourceError) -> String {
    format!(
        "batch {} ({size} symbols) failed: {}",
        index + 1,
        error.message()
    )
}
