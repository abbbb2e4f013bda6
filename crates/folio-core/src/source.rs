use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Quote source identifiers used in metadata and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Iex,
    Mock,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Iex, Self::Mock];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iex => "iex",
            Self::Mock => "mock",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "iex" | "iexcloud" => Ok(Self::Iex),
            "mock" => Ok(Self::Mock),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sources() {
        assert_eq!(ProviderId::from_str(" IEX ").expect("parses"), ProviderId::Iex);
        assert!(matches!(
            ProviderId::from_str("yahoo"),
            Err(ValidationError::InvalidSource { value }) if value == "yahoo"
        ));
    }
}
