//! Quote source trait and request/response types.
//!
//! A [`QuoteSource`] answers one [`BatchRequest`] at a time with the raw,
//! unvalidated quotes it found. Turning those into [`crate::QuoteRecord`]s and
//! deciding what to do with a failed batch is the job of
//! [`crate::BatchFetcher`].

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::{MetricKey, MetricOrigin, ProviderId, Symbol};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Internal,
}

/// Structured source error. A failed batch is reported, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// One batch of symbols plus the metrics the active strategy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub symbols: Vec<Symbol>,
    pub metrics: Vec<MetricKey>,
}

impl BatchRequest {
    pub fn new(symbols: Vec<Symbol>, metrics: Vec<MetricKey>) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "batch request must include at least one symbol",
            ));
        }
        Ok(Self { symbols, metrics })
    }

    /// Whether any requested metric lives outside the basic quote payload.
    pub fn needs_advanced_stats(&self) -> bool {
        self.metrics
            .iter()
            .any(|metric| metric.origin() == MetricOrigin::AdvancedStats)
    }
}

/// Unvalidated per-symbol payload as reported by a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawQuote {
    pub symbol: Symbol,
    pub price: Option<f64>,
    pub metrics: BTreeMap<MetricKey, Option<f64>>,
}

impl RawQuote {
    pub fn new(symbol: Symbol, price: Option<f64>) -> Self {
        Self {
            symbol,
            price,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, key: MetricKey, value: Option<f64>) -> Self {
        self.metrics.insert(key, value);
        self
    }
}

/// Quotes found for a batch, in request order. Symbols the source knows
/// nothing about are simply absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QuoteBatch {
    pub quotes: Vec<RawQuote>,
}

/// Quote source contract.
///
/// Implementations must be `Send + Sync`; the fetcher holds them behind an
/// `Arc<dyn QuoteSource>`.
pub trait QuoteSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Largest number of symbols a single [`BatchRequest`] may carry.
    fn max_batch_size(&self) -> usize;

    fn fetch<'a>(
        &'a self,
        req: BatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteBatch, SourceError>> + Send + 'a>>;
}
