//! Symbol universe loading.
//!
//! Constituent lists are CSV files with a header row containing a `Ticker`
//! column, in the shape index providers publish them:
//!
//! ```text
//! Ticker,Name
//! AAPL,Apple Inc.
//! "BRK.B","Berkshire Hathaway, Class B"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{Symbol, ValidationError};

const TICKER_COLUMN: &str = "ticker";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstituentsError {
    #[error("failed to read constituents file '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("constituents file has no header row")]
    MissingHeader,

    #[error("constituents header has no 'Ticker' column")]
    MissingTickerColumn,

    #[error("invalid ticker on line {line}: {source}")]
    InvalidTicker {
        line: usize,
        #[source]
        source: ValidationError,
    },

    #[error("constituents list is empty")]
    Empty,
}

impl ConstituentsError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "constituents.io",
            Self::MissingHeader => "constituents.missing_header",
            Self::MissingTickerColumn => "constituents.missing_ticker_column",
            Self::InvalidTicker { .. } => "constituents.invalid_ticker",
            Self::Empty => "constituents.empty",
        }
    }
}

/// Reads and parses a constituents CSV file.
pub fn load_constituents(path: &Path) -> Result<Vec<Symbol>, ConstituentsError> {
    let text = std::fs::read_to_string(path).map_err(|error| ConstituentsError::Io {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let symbols = parse_constituents(&text)?;
    debug!(path = %path.display(), symbols = symbols.len(), "loaded constituents");
    Ok(symbols)
}

/// Parses constituents CSV text. Order is preserved; repeats keep their first
/// occurrence.
pub fn parse_constituents(text: &str) -> Result<Vec<Symbol>, ConstituentsError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_start_matches('\u{feff}')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(ConstituentsError::MissingHeader)?;
    let column = split_csv_line(header)
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case(TICKER_COLUMN))
        .ok_or(ConstituentsError::MissingTickerColumn)?;

    let mut symbols = UniqueSymbols::default();
    for (line, text) in lines {
        let fields = split_csv_line(text);
        let raw = fields.get(column).map(String::as_str).unwrap_or_default();
        if raw.trim().is_empty() {
            continue;
        }
        let symbol =
            Symbol::parse(raw).map_err(|source| ConstituentsError::InvalidTicker { line, source })?;
        symbols.push(symbol);
    }

    symbols.finish()
}

/// Builds a symbol list from inline values such as `["AAPL", "msft,GOOG"]`.
/// Each value may itself be comma-separated.
pub fn symbols_from_list<I, S>(values: I) -> Result<Vec<Symbol>, ConstituentsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut symbols = UniqueSymbols::default();
    for (index, value) in values.into_iter().enumerate() {
        for part in value.as_ref().split(',').filter(|part| !part.trim().is_empty()) {
            let symbol = Symbol::parse(part).map_err(|source| ConstituentsError::InvalidTicker {
                line: index + 1,
                source,
            })?;
            symbols.push(symbol);
        }
    }
    symbols.finish()
}

#[derive(Default)]
struct UniqueSymbols {
    seen: HashSet<Symbol>,
    ordered: Vec<Symbol>,
    duplicates: usize,
}

impl UniqueSymbols {
    fn push(&mut self, symbol: Symbol) {
        if self.seen.insert(symbol.clone()) {
            self.ordered.push(symbol);
        } else {
            self.duplicates += 1;
        }
    }

    fn finish(self) -> Result<Vec<Symbol>, ConstituentsError> {
        if self.duplicates > 0 {
            debug!(duplicates = self.duplicates, "dropped repeated tickers");
        }
        if self.ordered.is_empty() {
            return Err(ConstituentsError::Empty);
        }
        Ok(self.ordered)
    }
}

/// Splits one CSV line, honouring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}
