use std::future::Future;
use std::pin::Pin;

use crate::data_source::{BatchRequest, QuoteBatch, QuoteSource, RawQuote, SourceError};
use crate::{MetricKey, ProviderId, Symbol};

/// Deterministic offline source.
///
/// Every value is derived from the ticker bytes, so the same symbol always
/// yields the same quote. Roughly one metric value in eleven is reported
/// missing, which exercises imputation.
#[derive(Debug, Clone)]
pub struct MockSource {
    max_batch_size: usize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self { max_batch_size: 100 }
    }
}

impl MockSource {
    pub fn with_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Quote this source reports for `symbol`, with every metric in `metrics`.
    pub fn quote_for(symbol: &Symbol, metrics: &[MetricKey]) -> RawQuote {
        let seed = symbol_seed(symbol);
        let price = round2(5.0 + (seed % 49_500) as f64 / 100.0);

        metrics.iter().fold(RawQuote::new(symbol.clone(), Some(price)), |raw, key| {
            let value = mock_metric(seed, *key);
            raw.with_metric(*key, value)
        })
    }
}

impl QuoteSource for MockSource {
    fn id(&self) -> ProviderId {
        ProviderId::Mock
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    fn fetch<'a>(
        &'a self,
        req: BatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if req.symbols.len() > self.max_batch_size {
                return Err(SourceError::invalid_request(format!(
                    "mock batches are limited to {} symbols, got {}",
                    self.max_batch_size,
                    req.symbols.len()
                )));
            }

            let quotes = req
                .symbols
                .iter()
                .map(|symbol| Self::quote_for(symbol, &req.metrics))
                .collect();
            Ok(QuoteBatch { quotes })
        })
    }
}

fn mock_metric(seed: u64, key: MetricKey) -> Option<f64> {
    let salt = key as u64 + 1;
    let mixed = seed
        .wrapping_mul(salt.wrapping_mul(2_654_435_761))
        .rotate_left(salt as u32 * 7);

    if mixed % 11 == 0 {
        return None;
    }

    let unit = (mixed % 10_000) as f64 / 10_000.0;
    let value = match key {
        MetricKey::MarketCap => 2.0e9 + unit * 2.0e12,
        MetricKey::OneYearReturn => unit * 1.6 - 0.4,
        MetricKey::SixMonthReturn => unit * 0.9 - 0.25,
        MetricKey::ThreeMonthReturn => unit * 0.5 - 0.15,
        MetricKey::OneMonthReturn => unit * 0.24 - 0.08,
        MetricKey::PeRatio => unit * 70.0 - 10.0,
        MetricKey::PbRatio => 0.5 + unit * 14.5,
        MetricKey::PsRatio => 0.3 + unit * 11.7,
        MetricKey::EvToEbitda => 2.0 + unit * 38.0,
        MetricKey::EvToGrossProfit => 1.0 + unit * 24.0,
    };
    Some((value * 10_000.0).round() / 10_000.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(7_u64, |acc, byte| {
        acc.wrapping_mul(37).wrapping_add(byte as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(values: &[&str]) -> Vec<Symbol> {
        values
            .iter()
            .map(|value| Symbol::parse(value).expect("valid symbol"))
            .collect()
    }

    #[tokio::test]
    async fn same_symbol_yields_same_quote() {
        let source = MockSource::default();
        let request = BatchRequest::new(symbols(&["MSFT", "AAPL"]), MetricKey::ALL.to_vec())
            .expect("valid request");

        let first = source.fetch(request.clone()).await.expect("fetches");
        let second = source.fetch(request).await.expect("fetches");

        assert_eq!(first, second);
        assert_eq!(first.quotes.len(), 2);
        assert!(first.quotes.iter().all(|quote| quote.price.is_some_and(|p| p > 0.0)));
    }

    #[test]
    fn some_metrics_are_missing_across_a_universe() {
        let universe = (0..200)
            .map(|index| Symbol::parse(&format!("T{index}")).expect("valid symbol"))
            .collect::<Vec<_>>();

        let missing = universe
            .iter()
            .flat_map(|symbol| MockSource::quote_for(symbol, &MetricKey::ALL).metrics.into_values())
            .filter(Option::is_none)
            .count();

        assert!(missing > 0);
        assert!(missing < 200 * MetricKey::ALL.len() / 2);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected() {
        let source = MockSource::with_batch_size(1);
        let request = BatchRequest::new(symbols(&["A", "B"]), vec![MetricKey::PeRatio])
            .expect("valid request");

        assert!(source.fetch(request).await.is_err());
    }
}
