//! # Domain Models
//!
//! Value types shared by every stage of a ranking run.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, case-sensitive ticker |
//! | [`MetricKey`] | Closed catalogue of rankable metrics |
//! | [`MetricDefinition`] | Metric plus ranking direction and filter |
//! | [`QuoteRecord`] | Immutable price/metric snapshot for one symbol |
//! | [`Universe`] | Ordered set of records ranked together |
//! | [`PortfolioValue`] | Positive dollar amount to allocate |
//!
//! All types validate their invariants at construction time, so later stages
//! never see a non-positive price or a duplicate symbol.

mod metric;
mod portfolio;
mod record;
mod symbol;
mod universe;

pub use metric::{Direction, MetricDefinition, MetricKey, MetricOrigin};
pub use portfolio::PortfolioValue;
pub use record::QuoteRecord;
pub use symbol::Symbol;
pub use universe::Universe;
