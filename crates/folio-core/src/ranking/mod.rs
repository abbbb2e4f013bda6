//! Strategy definitions and the top-N ranker.

mod ranker;
mod strategy;

pub use ranker::{MetricScore, RankedEntry, Ranker, Selection};
pub use strategy::{RankMode, StrategyConfig, StrategyKind, DEFAULT_TOP_N};
