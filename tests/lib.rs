// Shared fixtures for the behaviour tests
pub use folio_core::{
    MetricDefinition, MetricKey, QuoteRecord, RankMode, Ranker, StrategyConfig, Universe,
};

/// Builds a universe of `(symbol, price, value)` rows for a single metric.
pub fn single_metric_universe(key: MetricKey, rows: &[(&str, f64, Option<f64>)]) -> Universe {
    Universe::new(
        rows.iter()
            .map(|(symbol, price, value)| {
                QuoteRecord::new(symbol, Some(*price), [(key, *value)]).expect("valid record")
            })
            .collect(),
    )
    .expect("unique symbols")
}

/// Composite strategy over `keys` in their natural directions.
pub fn composite(keys: &[MetricKey], top_n: usize) -> StrategyConfig {
    StrategyConfig::new(
        "composite-test",
        RankMode::Composite,
        keys.iter().copied().map(MetricDefinition::natural).collect(),
    )
    .expect("metrics present")
    .with_top_n(top_n)
    .expect("positive top-n")
}

pub fn ranked_symbols(universe: &Universe, config: StrategyConfig) -> Vec<String> {
    Ranker::new(config)
        .rank(universe)
        .expect("ranking succeeds")
        .entries
        .iter()
        .map(|entry| entry.record.symbol().to_string())
        .collect()
}
