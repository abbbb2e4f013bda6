//! # Folio Core
//!
//! Percentile scoring, composite ranking and position sizing for
//! equal-weight, momentum and value stock portfolios.
//!
//! ## Overview
//!
//! A run flows one way through pure stages:
//!
//! ```text
//! constituents ──▶ BatchFetcher ──▶ Universe
//!                   (QuoteSource)      │
//!                                      ▼
//!                                   Ranker ──▶ Selection ──▶ PositionSizer ──▶ Report
//!                  (impute, percentile, composite, top-N)
//! ```
//!
//! Everything from [`Universe`] onward is synchronous and deterministic:
//! the same universe and [`StrategyConfig`] always produce the same
//! [`Selection`] and the same [`Allocation`]s. Only fetching is async.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | IEX Cloud and deterministic mock quote sources |
//! | [`batch`] | Batched, paced fetching into a [`Universe`] |
//! | [`config`] | Environment-driven IEX settings |
//! | [`constituents`] | Ticker list loading |
//! | [`data_source`] | Quote source trait and request/response types |
//! | [`domain`] | Symbols, metrics, records, universes |
//! | [`envelope`] | JSON output envelope |
//! | [`error`] | Validation and ranking errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`ranking`] | Strategies and the top-N ranker |
//! | [`report`] | Typed report rows |
//! | [`scoring`] | Percentiles and mean imputation |
//! | [`sizing`] | Equal-weight position sizing |
//! | [`source`] | Source identifiers |
//! | [`throttling`] | Call pacing |
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_core::{
//!     MetricKey, PortfolioValue, PositionSizer, QuoteRecord, Ranker, StrategyKind, Universe,
//! };
//!
//! let universe = Universe::new(vec![
//!     QuoteRecord::new("AAA", Some(10.0), [(MetricKey::OneYearReturn, Some(0.5))])?,
//!     QuoteRecord::new("BBB", Some(20.0), [(MetricKey::OneYearReturn, Some(0.3))])?,
//! ])?;
//!
//! let selection = Ranker::new(StrategyKind::Momentum.config()).rank(&universe)?;
//! let value = PortfolioValue::new(1_000.0).expect("positive");
//! let allocations = PositionSizer::new(value).size(&selection.entries)?;
//!
//! assert_eq!(allocations[0].symbol.as_str(), "AAA");
//! assert_eq!(allocations[0].shares, 50);
//! # Ok::<(), folio_core::RankingError>(())
//! ```
//!
//! ## Security
//!
//! The IEX token is read from the environment only and never logged.

pub mod adapters;
pub mod batch;
pub mod config;
pub mod constituents;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod ranking;
pub mod report;
pub mod scoring;
pub mod sizing;
pub mod source;
pub mod throttling;

pub use adapters::{IexCloudSource, MockSource, IEX_MAX_BATCH_SIZE};
pub use batch::{BatchFetcher, FetchOutcome};
pub use config::{ConfigError, IexConfig, DEFAULT_IEX_BASE_URL, IEX_BASE_URL_VAR, IEX_TOKEN_VAR};
pub use constituents::{
    load_constituents, parse_constituents, symbols_from_list, ConstituentsError,
};
pub use data_source::{
    BatchRequest, QuoteBatch, QuoteSource, RawQuote, SourceError, SourceErrorKind,
};
pub use domain::{
    Direction, MetricDefinition, MetricKey, MetricOrigin, PortfolioValue, QuoteRecord, Symbol,
    Universe,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{RankingError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};
pub use ranking::{
    MetricScore, RankMode, RankedEntry, Ranker, Selection, StrategyConfig, StrategyKind,
    DEFAULT_TOP_N,
};
pub use report::{Cell, Report};
pub use scoring::{impute_mean, score_metric, ImputedColumn, MetricPercentile, Population};
pub use sizing::{Allocation, PositionSizer};
pub use source::ProviderId;
pub use throttling::BatchPacer;
