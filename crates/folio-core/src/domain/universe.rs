use std::collections::HashSet;

use serde::Serialize;

use crate::{QuoteRecord, RankingError};

/// Ordered, fully assembled set of records ranked together in one run.
///
/// Percentiles depend on every member, so a universe is immutable once built;
/// scoring a different set of records means building a new universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Universe {
    records: Vec<QuoteRecord>,
}

impl Universe {
    /// Builds a universe, rejecting duplicate symbols.
    pub fn new(records: Vec<QuoteRecord>) -> Result<Self, RankingError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.symbol()) {
                return Err(RankingError::malformed(
                    record.symbol().as_str(),
                    "symbol appears more than once in the universe",
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuoteRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a QuoteRecord;
    type IntoIter = std::slice::Iter<'a, QuoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order() {
        let universe = Universe::new(vec![
            QuoteRecord::new("MSFT", Some(400.0), []).expect("valid"),
            QuoteRecord::new("AAPL", Some(180.0), []).expect("valid"),
        ])
        .expect("valid universe");

        let symbols = universe
            .iter()
            .map(|record| record.symbol().as_str())
            .collect::<Vec<_>>();
        assert_eq!(symbols, vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let err = Universe::new(vec![
            QuoteRecord::new("AAPL", Some(180.0), []).expect("valid"),
            QuoteRecord::new("AAPL", Some(181.0), []).expect("valid"),
        ])
        .expect_err("must fail");

        assert!(matches!(err, RankingError::MalformedRecord { symbol, .. } if symbol == "AAPL"));
    }
}
