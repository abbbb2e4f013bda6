//! Percentile scoring and mean imputation.
//!
//! Both stages are pure functions of a [`crate::Universe`]; neither mutates
//! the records it reads.

mod impute;
mod percentile;

pub use impute::{impute_mean, ImputedColumn};
pub use percentile::{score_metric, MetricPercentile, Population};
