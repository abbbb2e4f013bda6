use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Which end of a metric's range is desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Upstream endpoint family a metric is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricOrigin {
    Quote,
    AdvancedStats,
}

/// Closed catalogue of metrics the strategies rank on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    MarketCap,
    OneYearReturn,
    SixMonthReturn,
    ThreeMonthReturn,
    OneMonthReturn,
    PeRatio,
    PbRatio,
    PsRatio,
    EvToEbitda,
    EvToGrossProfit,
}

impl MetricKey {
    pub const ALL: [Self; 10] = [
        Self::MarketCap,
        Self::OneYearReturn,
        Self::SixMonthReturn,
        Self::ThreeMonthReturn,
        Self::OneMonthReturn,
        Self::PeRatio,
        Self::PbRatio,
        Self::PsRatio,
        Self::EvToEbitda,
        Self::EvToGrossProfit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketCap => "market_cap",
            Self::OneYearReturn => "one_year_return",
            Self::SixMonthReturn => "six_month_return",
            Self::ThreeMonthReturn => "three_month_return",
            Self::OneMonthReturn => "one_month_return",
            Self::PeRatio => "pe_ratio",
            Self::PbRatio => "pb_ratio",
            Self::PsRatio => "ps_ratio",
            Self::EvToEbitda => "ev_to_ebitda",
            Self::EvToGrossProfit => "ev_to_gross_profit",
        }
    }

    /// Human-readable column label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketCap => "Market Capitalization",
            Self::OneYearReturn => "One-Year Price Return",
            Self::SixMonthReturn => "Six-Month Price Return",
            Self::ThreeMonthReturn => "Three-Month Price Return",
            Self::OneMonthReturn => "One-Month Price Return",
            Self::PeRatio => "Price-to-Earnings Ratio",
            Self::PbRatio => "Price-to-Book Ratio",
            Self::PsRatio => "Price-to-Sales Ratio",
            Self::EvToEbitda => "EV/EBITDA",
            Self::EvToGrossProfit => "EV/GP",
        }
    }

    /// Returns are better when high, valuation ratios when low.
    pub const fn natural_direction(self) -> Direction {
        match self {
            Self::MarketCap
            | Self::OneYearReturn
            | Self::SixMonthReturn
            | Self::ThreeMonthReturn
            | Self::OneMonthReturn => Direction::HigherIsBetter,
            Self::PeRatio
            | Self::PbRatio
            | Self::PsRatio
            | Self::EvToEbitda
            | Self::EvToGrossProfit => Direction::LowerIsBetter,
        }
    }

    pub const fn origin(self) -> MetricOrigin {
        match self {
            Self::MarketCap | Self::PeRatio => MetricOrigin::Quote,
            _ => MetricOrigin::AdvancedStats,
        }
    }
}

impl Display for MetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or(ValidationError::InvalidMetric {
                value: value.to_owned(),
            })
    }
}

/// A metric as used by one strategy: key, ranking direction and filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub key: MetricKey,
    pub direction: Direction,
    /// Drop records whose value is missing or not strictly positive.
    #[serde(default)]
    pub require_positive: bool,
}

impl MetricDefinition {
    pub const fn new(key: MetricKey, direction: Direction) -> Self {
        Self {
            key,
            direction,
            require_positive: false,
        }
    }

    /// Definition using the metric's natural direction.
    pub const fn natural(key: MetricKey) -> Self {
        Self::new(key, key.natural_direction())
    }

    pub const fn positive_only(mut self) -> Self {
        self.require_positive = true;
        self
    }
}
