//! Tabular view of a sized selection.
//!
//! A [`Report`] fixes column order and cell types once; renderers (table,
//! CSV, JSON) only decide how each [`Cell`] is spelled.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::ranking::{RankMode, Selection, StrategyConfig};
use crate::{Allocation, MetricKey, Symbol};

pub const TICKER_COLUMN: &str = "Ticker";
pub const PRICE_COLUMN: &str = "Price";
pub const SHARES_COLUMN: &str = "Number of Shares to Buy";
const DEFAULT_SCORE_LABEL: &str = "Composite Score";

/// One typed report value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Dollar(f64),
    Integer(u64),
    Float(f64),
    /// A fraction, rendered as a percentage.
    Percent(f64),
    Empty,
}

impl Cell {
    /// Human-facing spelling used by the table renderer.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Dollar(value) => format!("${value:.2}"),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => format!("{value:.2}"),
            Self::Percent(value) => format!("{:.1}%", value * 100.0),
            Self::Empty => String::from("n/a"),
        }
    }

    /// Machine-facing spelling used by the CSV renderer; numbers stay unformatted.
    pub fn raw(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Dollar(value) => format!("{value:.2}"),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) | Self::Percent(value) => value.to_string(),
            Self::Empty => String::new(),
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Dollar(_) | Self::Integer(_) | Self::Float(_) | Self::Percent(_)
        )
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Dollar(value) | Self::Float(value) | Self::Percent(value) => {
                serializer.serialize_f64(*value)
            }
            Self::Integer(value) => serializer.serialize_u64(*value),
            Self::Empty => serializer.serialize_none(),
        }
    }
}

/// Ordered rows under a fixed column order, best-ranked first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub strategy: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    /// Builds the report for `selection`. Allocations are matched by symbol;
    /// an entry without one gets an empty share count.
    pub fn build(
        config: &StrategyConfig,
        selection: &Selection,
        allocations: &[Allocation],
    ) -> Self {
        let composite = config.mode == RankMode::Composite;
        let score_label = config
            .score_label
            .as_deref()
            .unwrap_or(DEFAULT_SCORE_LABEL);

        let mut columns = vec![
            TICKER_COLUMN.to_owned(),
            PRICE_COLUMN.to_owned(),
            SHARES_COLUMN.to_owned(),
        ];
        for metric in &config.metrics {
            columns.push(metric.key.label().to_owned());
            if composite {
                columns.push(format!("{} Percentile", metric.key.label()));
            }
        }
        if composite {
            columns.push(score_label.to_owned());
        }

        let shares = allocations
            .iter()
            .map(|allocation| (&allocation.symbol, allocation.shares))
            .collect::<HashMap<&Symbol, u64>>();

        let rows = selection
            .entries
            .iter()
            .map(|entry| {
                let mut row = Vec::with_capacity(columns.len());
                row.push(Cell::Text(entry.record.symbol().to_string()));
                row.push(entry.record.price().map_or(Cell::Empty, Cell::Dollar));
                row.push(
                    shares
                        .get(entry.record.symbol())
                        .map_or(Cell::Empty, |count| Cell::Integer(*count)),
                );

                for metric in &config.metrics {
                    let scored = entry.metric(metric.key);
                    let raw = scored
                        .and_then(|score| score.raw)
                        .or_else(|| entry.record.metric(metric.key));
                    row.push(raw.map_or(Cell::Empty, |value| metric_cell(metric.key, value)));
                    // Oriented so 100% is always best, matching what the score averages.
                    if composite {
                        row.push(
                            scored
                                .and_then(|score| score.score)
                                .map_or(Cell::Empty, Cell::Percent),
                        );
                    }
                }

                if composite {
                    row.push(entry.composite.map_or(Cell::Empty, Cell::Percent));
                }
                row
            })
            .collect();

        Self {
            strategy: config.name.clone(),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

fn metric_cell(key: MetricKey, value: f64) -> Cell {
    match key {
        MetricKey::MarketCap => Cell::Dollar(value),
        MetricKey::OneYearReturn
        | MetricKey::SixMonthReturn
        | MetricKey::ThreeMonthReturn
        | MetricKey::OneMonthReturn => Cell::Percent(value),
        MetricKey::PeRatio
        | MetricKey::PbRatio
        | MetricKey::PsRatio
        | MetricKey::EvToEbitda
        | MetricKey::EvToGrossProfit => Cell::Float(value),
    }
}
