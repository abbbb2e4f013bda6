use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker a constituents file or quote reply may carry.
const MAX_SYMBOL_LEN: usize = 15;

/// Ticker as it appears in the constituents list, e.g. `AAPL` or `BRK.B`.
///
/// Records, allocations and report rows are keyed by it. Case is kept as
/// given, so `brk.b` and `BRK.B` never collapse into one position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim();

        let mut chars = ticker.chars();
        let first = chars.next().ok_or(ValidationError::EmptySymbol)?;
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }

        let len = ticker.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        // Share classes are written `BRK.B` or `BRK-B` depending on the vendor.
        for (offset, ch) in chars.enumerate() {
            if !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')) {
                return Err(ValidationError::SymbolInvalidChar {
                    ch,
                    index: offset + 1,
                });
            }
        }

        Ok(Self(ticker.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
