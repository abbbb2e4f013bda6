use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MetricDefinition, MetricKey, ValidationError};

/// Default selection size for the ranked strategies.
pub const DEFAULT_TOP_N: usize = 50;

/// How a strategy orders its universe before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Keep input order; every metric is informational only.
    Unranked,
    /// Sort on the raw value of the first metric, following its direction.
    ByMetric,
    /// Sort on the mean of per-metric percentile scores.
    Composite,
}

impl RankMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unranked => "unranked",
            Self::ByMetric => "by_metric",
            Self::Composite => "composite",
        }
    }
}

/// Built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    EqualWeight,
    Momentum,
    #[serde(rename = "hqm")]
    HighQualityMomentum,
    Value,
    #[serde(rename = "rv")]
    RobustValue,
}

impl StrategyKind {
    pub const ALL: [Self; 5] = [
        Self::EqualWeight,
        Self::Momentum,
        Self::HighQualityMomentum,
        Self::Value,
        Self::RobustValue,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EqualWeight => "equal-weight",
            Self::Momentum => "momentum",
            Self::HighQualityMomentum => "hqm",
            Self::Value => "value",
            Self::RobustValue => "rv",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::EqualWeight => "every constituent, equal dollar weight",
            Self::Momentum => "highest one-year price return",
            Self::HighQualityMomentum => "best mean percentile of 1y/6m/3m/1m returns",
            Self::Value => "lowest positive price-to-earnings ratio",
            Self::RobustValue => "best mean percentile of five valuation ratios",
        }
    }

    pub fn config(self) -> StrategyConfig {
        use MetricKey::*;

        fn natural(keys: &[MetricKey]) -> Vec<MetricDefinition> {
            keys.iter().copied().map(MetricDefinition::natural).collect()
        }

        let (mode, metrics, top_n, score_label) = match self {
            Self::EqualWeight => (RankMode::Unranked, natural(&[MarketCap]), None, None),
            Self::Momentum => (
                RankMode::ByMetric,
                natural(&[OneYearReturn]),
                Some(DEFAULT_TOP_N),
                None,
            ),
            Self::HighQualityMomentum => (
                RankMode::Composite,
                natural(&[OneYearReturn, SixMonthReturn, ThreeMonthReturn, OneMonthReturn]),
                Some(DEFAULT_TOP_N),
                Some("HQM Score"),
            ),
            Self::Value => (
                RankMode::ByMetric,
                vec![MetricDefinition::natural(PeRatio).positive_only()],
                Some(DEFAULT_TOP_N),
                None,
            ),
            Self::RobustValue => (
                RankMode::Composite,
                natural(&[PeRatio, PbRatio, PsRatio, EvToEbitda, EvToGrossProfit]),
                Some(DEFAULT_TOP_N),
                Some("RV Score"),
            ),
        };

        StrategyConfig {
            name: self.as_str().to_owned(),
            mode,
            metrics,
            top_n,
            score_label: score_label.map(str::to_owned),
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "equal-weight" | "equal_weight" | "equalweight" => Ok(Self::EqualWeight),
            "momentum" => Ok(Self::Momentum),
            "hqm" | "high-quality-momentum" => Ok(Self::HighQualityMomentum),
            "value" => Ok(Self::Value),
            "rv" | "robust-value" => Ok(Self::RobustValue),
            other => Err(ValidationError::InvalidStrategy {
                value: other.to_owned(),
            }),
        }
    }
}

/// Everything the ranker needs to know about one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyConfig {
    pub name: String,
    pub mode: RankMode,
    pub metrics: Vec<MetricDefinition>,
    /// `None` keeps the whole (filtered) universe.
    pub top_n: Option<usize>,
    /// Report column for the composite score.
    pub score_label: Option<String>,
}

impl StrategyConfig {
    /// Custom strategy. Ranked modes need at least one metric.
    pub fn new(
        name: impl Into<String>,
        mode: RankMode,
        metrics: Vec<MetricDefinition>,
    ) -> Result<Self, ValidationError> {
        if mode != RankMode::Unranked && metrics.is_empty() {
            return Err(ValidationError::EmptyMetricSet);
        }

        Ok(Self {
            name: name.into(),
            mode,
            metrics,
            top_n: None,
            score_label: None,
        })
    }

    pub fn with_top_n(mut self, top_n: usize) -> Result<Self, ValidationError> {
        if top_n == 0 {
            return Err(ValidationError::ZeroTopN);
        }
        self.top_n = Some(top_n);
        Ok(self)
    }

    pub fn with_score_label(mut self, label: impl Into<String>) -> Self {
        self.score_label = Some(label.into());
        self
    }

    pub(crate) fn has_filters(&self) -> bool {
        self.metrics.iter().any(|metric| metric.require_positive)
    }

    /// Metric keys whose values must be fetched for this strategy.
    pub fn metric_keys(&self) -> Vec<MetricKey> {
        self.metrics.iter().map(|metric| metric.key).collect()
    }
}
