use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::ranking::strategy::{RankMode, StrategyConfig};
use crate::scoring::{impute_mean, Population};
use crate::{Direction, MetricDefinition, MetricKey, QuoteRecord, RankingError, Universe};

/// One metric of one selected record, as it entered the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub key: MetricKey,
    pub direction: Direction,
    /// Value reported by the source.
    pub raw: Option<f64>,
    /// Value used for ranking; the universe mean when `imputed`.
    pub value: Option<f64>,
    pub imputed: bool,
    /// Fraction of the universe `<=` this value. Composite mode only.
    pub percentile: Option<f64>,
    /// Direction-oriented percentile feeding the composite. Composite mode only.
    pub score: Option<f64>,
}

/// A record that made the cut, with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub record: QuoteRecord,
    pub metrics: Vec<MetricScore>,
    pub composite: Option<f64>,
}

impl RankedEntry {
    pub fn metric(&self, key: MetricKey) -> Option<&MetricScore> {
        self.metrics.iter().find(|metric| metric.key == key)
    }
}

/// Ordered top-N output of a ranking run, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub strategy: String,
    pub mode: RankMode,
    pub universe_size: usize,
    /// Records remaining after `require_positive` filters.
    pub eligible: usize,
    /// Number of values filled with the universe mean, per metric.
    pub imputations: BTreeMap<MetricKey, usize>,
    pub entries: Vec<RankedEntry>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scores, sorts and truncates a universe according to a [`StrategyConfig`].
///
/// Ranking is a pure function of the universe and configuration: the same
/// input always yields the same selection, and ties keep input order.
#[derive(Debug, Clone)]
pub struct Ranker {
    config: StrategyConfig,
}

struct Candidate {
    record: QuoteRecord,
    metrics: Vec<MetricScore>,
    composite: Option<f64>,
}

impl Ranker {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn rank(&self, universe: &Universe) -> Result<Selection, RankingError> {
        if universe.is_empty() {
            return Err(RankingError::ZeroUniverse { operation: "ranking" });
        }

        if self.config.mode == RankMode::ByMetric {
            self.require_sort_metric(universe)?;
        }

        let filtered;
        let eligible = if self.config.has_filters() {
            filtered = self.apply_filters(universe)?;
            &filtered
        } else {
            universe
        };

        let mut imputations = BTreeMap::new();
        let mut candidates = match self.config.mode {
            RankMode::Unranked => self.unscored(eligible),
            RankMode::ByMetric => {
                let mut candidates = self.unscored(eligible);
                if let Some(first) = self.config.metrics.first() {
                    sort_by_first_metric(&mut candidates, *first);
                }
                candidates
            }
            RankMode::Composite => {
                let mut candidates = self.composite(eligible, &mut imputations)?;
                candidates.sort_by(|a, b| descending(a.composite, b.composite));
                candidates
            }
        };

        if let Some(top_n) = self.config.top_n {
            candidates.truncate(top_n);
        }

        let entries = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| RankedEntry {
                rank: index + 1,
                record: candidate.record,
                metrics: candidate.metrics,
                composite: candidate.composite,
            })
            .collect::<Vec<_>>();

        debug!(
            strategy = %self.config.name,
            universe = universe.len(),
            eligible = eligible.len(),
            selected = entries.len(),
            "ranked universe"
        );

        Ok(Selection {
            strategy: self.config.name.clone(),
            mode: self.config.mode,
            universe_size: universe.len(),
            eligible: eligible.len(),
            imputations,
            entries,
        })
    }

    /// A sort key nobody reported cannot order anything. Checked on the
    /// unfiltered universe so the failure names the metric, not an empty
    /// selection.
    fn require_sort_metric(&self, universe: &Universe) -> Result<(), RankingError> {
        let Some(first) = self.config.metrics.first() else {
            return Ok(());
        };
        if universe.iter().any(|record| record.metric(first.key).is_some()) {
            Ok(())
        } else {
            Err(RankingError::InsufficientData { metric: first.key })
        }
    }

    fn apply_filters(&self, universe: &Universe) -> Result<Universe, RankingError> {
        let required = self
            .config
            .metrics
            .iter()
            .filter(|metric| metric.require_positive)
            .map(|metric| metric.key)
            .collect::<Vec<_>>();

        let kept = universe
            .iter()
            .filter(|record| {
                required
                    .iter()
                    .all(|key| record.metric(*key).is_some_and(|value| value > 0.0))
            })
            .cloned()
            .collect();

        Universe::new(kept)
    }

    fn unscored(&self, universe: &Universe) -> Vec<Candidate> {
        universe
            .iter()
            .map(|record| Candidate {
                record: record.clone(),
                metrics: self
                    .config
                    .metrics
                    .iter()
                    .map(|definition| {
                        let raw = record.metric(definition.key);
                        MetricScore {
                            key: definition.key,
                            direction: definition.direction,
                            raw,
                            value: raw,
                            imputed: false,
                            percentile: None,
                            score: None,
                        }
                    })
                    .collect(),
                composite: None,
            })
            .collect()
    }

    fn composite(
        &self,
        universe: &Universe,
        imputations: &mut BTreeMap<MetricKey, usize>,
    ) -> Result<Vec<Candidate>, RankingError> {
        let mut columns = Vec::with_capacity(self.config.metrics.len());
        for definition in &self.config.metrics {
            let column = impute_mean(universe, definition.key)?;
            let population = Population::new(column.values.iter().copied()).ok_or(
                RankingError::ZeroUniverse {
                    operation: "percentile scoring",
                },
            )?;

            let filled = column.imputed_count();
            if filled > 0 {
                debug!(metric = %definition.key, filled, mean = column.mean, "imputed missing values");
            }
            imputations.insert(definition.key, filled);
            columns.push((*definition, column, population));
        }

        Ok(universe
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let metrics = columns
                    .iter()
                    .map(|(definition, column, population)| {
                        let value = column.values[index];
                        MetricScore {
                            key: definition.key,
                            direction: definition.direction,
                            raw: record.metric(definition.key),
                            value: Some(value),
                            imputed: column.imputed[index],
                            percentile: Some(population.percentile(value)),
                            score: Some(population.desirability(value, definition.direction)),
                        }
                    })
                    .collect::<Vec<_>>();

                let composite = (!metrics.is_empty()).then(|| {
                    let total = metrics.iter().filter_map(|metric| metric.score).sum::<f64>();
                    total / metrics.len() as f64
                });

                Candidate {
                    record: record.clone(),
                    metrics,
                    composite,
                }
            })
            .collect())
    }
}

/// Stable sort on the raw value of `definition`; missing values go last.
fn sort_by_first_metric(candidates: &mut [Candidate], definition: MetricDefinition) {
    candidates.sort_by(|a, b| {
        let left = a.record.metric(definition.key);
        let right = b.record.metric(definition.key);
        match definition.direction {
            Direction::HigherIsBetter => descending(left, right),
            Direction::LowerIsBetter => ascending(left, right),
        }
    });
}

fn descending(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => r.total_cmp(&l),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn ascending(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
