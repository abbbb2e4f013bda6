use super::percentile::population_for;
use crate::{MetricKey, RankingError, Universe};

/// One metric's values across a universe after mean imputation.
///
/// Records are never modified; the filled column lives beside them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub key: MetricKey,
    /// One value per record, in universe order.
    pub values: Vec<f64>,
    /// `true` where the value was filled in with `mean`.
    pub imputed: Vec<bool>,
    /// Mean of the non-missing values.
    pub mean: f64,
}

impl ImputedColumn {
    pub fn imputed_count(&self) -> usize {
        self.imputed.iter().filter(|flag| **flag).count()
    }
}

/// Replaces missing values of `key` with the arithmetic mean of the present ones.
///
/// Fails with [`RankingError::InsufficientData`] when no record has the metric,
/// since the mean of an empty set is undefined.
pub fn impute_mean(universe: &Universe, key: MetricKey) -> Result<ImputedColumn, RankingError> {
    let population = population_for(universe, key)?;

    let present = universe.iter().filter_map(|record| record.metric(key));
    let mean = present.sum::<f64>() / population.len() as f64;

    let (values, imputed) = universe
        .iter()
        .map(|record| match record.metric(key) {
            Some(value) => (value, false),
            None => (mean, true),
        })
        .unzip();

    Ok(ImputedColumn {
        key,
        values,
        imputed,
        mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuoteRecord;

    fn universe(values: &[Option<f64>]) -> Universe {
        Universe::new(
            values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    let symbol = format!("S{index}");
                    QuoteRecord::new(&symbol, Some(10.0), [(MetricKey::PsRatio, *value)])
                        .expect("valid record")
                })
                .collect(),
        )
        .expect("valid universe")
    }

    #[test]
    fn fills_missing_with_mean_of_present_values() {
        let column = impute_mean(&universe(&[Some(10.0), None, Some(30.0)]), MetricKey::PsRatio)
            .expect("imputes");

        assert_eq!(column.values, vec![10.0, 20.0, 30.0]);
        assert_eq!(column.imputed, vec![false, true, false]);
        assert_eq!(column.imputed_count(), 1);
    }

    #[test]
    fn leaves_records_untouched() {
        let universe = universe(&[Some(4.0), None]);
        let _ = impute_mean(&universe, MetricKey::PsRatio).expect("imputes");
        assert_eq!(universe.records()[1].metric(MetricKey::PsRatio), None);
    }

    #[test]
    fn imputes_each_metric_independently() {
        let universe = Universe::new(vec![
            QuoteRecord::new(
                "A",
                Some(1.0),
                [(MetricKey::PeRatio, None), (MetricKey::PbRatio, Some(2.0))],
            )
            .expect("valid"),
            QuoteRecord::new(
                "B",
                Some(1.0),
                [(MetricKey::PeRatio, Some(8.0)), (MetricKey::PbRatio, Some(4.0))],
            )
            .expect("valid"),
        ])
        .expect("valid universe");

        let pe = impute_mean(&universe, MetricKey::PeRatio).expect("imputes");
        let pb = impute_mean(&universe, MetricKey::PbRatio).expect("imputes");

        assert_eq!(pe.imputed, vec![true, false]);
        assert_eq!(pb.imputed, vec![false, false]);
        assert_eq!(pb.values, vec![2.0, 4.0]);
    }

    #[test]
    fn all_missing_column_cannot_be_imputed() {
        let err = impute_mean(&universe(&[None, None]), MetricKey::PsRatio).expect_err("must fail");
        assert_eq!(
            err,
            RankingError::InsufficientData {
                metric: MetricKey::PsRatio
            }
        );
    }
}
