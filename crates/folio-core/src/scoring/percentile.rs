use serde::Serialize;

use crate::{Direction, MetricDefinition, MetricKey, RankingError, Universe};

/// Sorted copy of one metric's non-missing values across a universe.
///
/// Percentiles use an inclusive comparison: tied values share a percentile,
/// the maximum maps to 1.0 and a unique minimum maps to `1 / len`, never 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    sorted: Vec<f64>,
}

impl Population {
    /// Returns `None` when there is nothing to rank against.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self { sorted })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Fraction of values `<= value`.
    pub fn percentile(&self, value: f64) -> f64 {
        let at_most = self.sorted.partition_point(|v| *v <= value);
        at_most as f64 / self.len() as f64
    }

    /// Fraction of values `>= value`; the mirror image of [`Self::percentile`].
    pub fn reverse_percentile(&self, value: f64) -> f64 {
        let below = self.sorted.partition_point(|v| *v < value);
        (self.len() - below) as f64 / self.len() as f64
    }

    /// Direction-aware percentile where values closer to 1.0 are always more desirable.
    pub fn desirability(&self, value: f64, direction: Direction) -> f64 {
        match direction {
            Direction::HigherIsBetter => self.percentile(value),
            Direction::LowerIsBetter => self.reverse_percentile(value),
        }
    }
}

/// Percentile of one record on one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricPercentile {
    /// Fraction of the population `<=` this value, regardless of direction.
    pub percentile: f64,
    /// Same rule oriented by direction, used for composite scoring.
    pub score: f64,
}

/// Scores every record of `universe` on `definition`, without imputation.
///
/// Records missing the metric get `None`.
pub fn score_metric(
    universe: &Universe,
    definition: MetricDefinition,
) -> Result<Vec<Option<MetricPercentile>>, RankingError> {
    let population = population_for(universe, definition.key)?;

    Ok(universe
        .iter()
        .map(|record| {
            record.metric(definition.key).map(|value| MetricPercentile {
                percentile: population.percentile(value),
                score: population.desirability(value, definition.direction),
            })
        })
        .collect())
}

pub(crate) fn population_for(
    universe: &Universe,
    key: MetricKey,
) -> Result<Population, RankingError> {
    if universe.is_empty() {
        return Err(RankingError::ZeroUniverse {
            operation: "percentile scoring",
        });
    }

    Population::new(universe.iter().filter_map(|record| record.metric(key)))
        .ok_or(RankingError::InsufficientData { metric: key })
}
