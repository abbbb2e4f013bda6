use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ValidationError;

/// Total dollar value to spread across a selection. Always finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PortfolioValue(f64);

impl PortfolioValue {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::NonPositivePortfolioValue);
        }
        Ok(Self(value))
    }

    /// Parses user-supplied text such as `"10000"` or `" 2500.50 "`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value = input
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPortfolioValue {
                value: input.trim().to_owned(),
            })?;
        Self::new(value)
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for PortfolioValue {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for PortfolioValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for PortfolioValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}
