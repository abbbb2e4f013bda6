use std::collections::BTreeMap;

use serde::Serialize;

use crate::{MetricKey, RankingError, Symbol};

/// Immutable per-symbol snapshot of price and metrics for one evaluation run.
///
/// `None` marks a value the upstream source did not provide, which is distinct
/// from zero or a negative number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    symbol: Symbol,
    price: Option<f64>,
    metrics: BTreeMap<MetricKey, Option<f64>>,
}

impl QuoteRecord {
    pub fn new<I>(symbol: &str, price: Option<f64>, metrics: I) -> Result<Self, RankingError>
    where
        I: IntoIterator<Item = (MetricKey, Option<f64>)>,
    {
        let symbol =
            Symbol::parse(symbol).map_err(|error| RankingError::malformed(symbol, error.to_string()))?;

        if let Some(price) = price {
            if !price.is_finite() || price <= 0.0 {
                return Err(RankingError::malformed(
                    symbol.as_str(),
                    format!("price {price} must be a finite number greater than zero"),
                ));
            }
        }

        let metrics = metrics.into_iter().collect::<BTreeMap<_, _>>();
        if let Some((key, value)) = metrics
            .iter()
            .find_map(|(key, value)| value.filter(|v| !v.is_finite()).map(|v| (*key, v)))
        {
            return Err(RankingError::malformed(
                symbol.as_str(),
                format!("metric '{key}' has non-finite value {value}"),
            ));
        }

        Ok(Self {
            symbol,
            price,
            metrics,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Metric value, `None` when missing or never reported.
    pub fn metric(&self, key: MetricKey) -> Option<f64> {
        self.metrics.get(&key).copied().flatten()
    }

    pub fn metrics(&self) -> impl Iterator<Item = (MetricKey, Option<f64>)> + '_ {
        self.metrics.iter().map(|(key, value)| (*key, *value))
    }
}
