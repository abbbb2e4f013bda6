//! Equal-weight position sizing.

use serde::Serialize;

use crate::{PortfolioValue, RankedEntry, RankingError, Symbol};

/// Dollar target and whole-share count for one selected symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub symbol: Symbol,
    pub price: f64,
    pub target_dollar_amount: f64,
    pub shares: u64,
}

impl Allocation {
    /// Dollars actually spent buying `shares` at `price`.
    pub fn invested(&self) -> f64 {
        self.shares as f64 * self.price
    }
}

/// Splits a portfolio value evenly across a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizer {
    portfolio_value: PortfolioValue,
}

impl PositionSizer {
    pub const fn new(portfolio_value: PortfolioValue) -> Self {
        Self { portfolio_value }
    }

    pub const fn portfolio_value(&self) -> PortfolioValue {
        self.portfolio_value
    }

    /// One allocation per entry, in selection order.
    ///
    /// Every price is checked before any division, so a single bad price
    /// yields no allocations at all.
    pub fn size(&self, entries: &[RankedEntry]) -> Result<Vec<Allocation>, RankingError> {
        if entries.is_empty() {
            return Err(RankingError::ZeroUniverse {
                operation: "position sizing",
            });
        }

        let prices = entries
            .iter()
            .map(|entry| match entry.record.price() {
                Some(price) if price.is_finite() && price > 0.0 => Ok(price),
                _ => Err(RankingError::InvalidPrice {
                    symbol: entry.record.symbol().clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let target = self.portfolio_value.get() / entries.len() as f64;

        Ok(entries
            .iter()
            .zip(prices)
            .map(|(entry, price)| Allocation {
                symbol: entry.record.symbol().clone(),
                price,
                target_dollar_amount: target,
                shares: (target / price).floor() as u64,
            })
            .collect())
    }
}
