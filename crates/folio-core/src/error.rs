use thiserror::Error;

use crate::{MetricKey, Symbol};

/// Validation and contract errors exposed by `folio-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid metric '{value}'")]
    InvalidMetric { value: String },
    #[error("invalid strategy '{value}', expected one of equal-weight, momentum, hqm, value, rv")]
    InvalidStrategy { value: String },
    #[error("invalid source '{value}', expected one of iex, mock")]
    InvalidSource { value: String },
    #[error("top-n must be at least 1")]
    ZeroTopN,
    #[error("ranked strategies need at least one metric")]
    EmptyMetricSet,

    #[error("portfolio value '{value}' is not a number")]
    InvalidPortfolioValue { value: String },
    #[error("portfolio value must be a finite number greater than zero")]
    NonPositivePortfolioValue,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failures raised by the scoring, ranking and sizing pipeline.
///
/// Every variant aborts the run it occurs in.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankingError {
    #[error("malformed quote record '{symbol}': {reason}")]
    MalformedRecord { symbol: String, reason: String },

    #[error("metric '{metric}' has no values anywhere in the universe")]
    InsufficientData { metric: MetricKey },

    #[error("cannot run {operation} against an empty universe")]
    ZeroUniverse { operation: &'static str },

    #[error("symbol '{symbol}' has a missing or non-positive price")]
    InvalidPrice { symbol: Symbol },
}

impl RankingError {
    pub(crate) fn malformed(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, mirrored in CLI error output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "ranking.malformed_record",
            Self::InsufficientData { .. } => "ranking.insufficient_data",
            Self::ZeroUniverse { .. } => "ranking.zero_universe",
            Self::InvalidPrice { .. } => "ranking.invalid_price",
        }
    }
}
