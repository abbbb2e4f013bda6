//! Interactive portfolio value prompt.

use std::io::{BufRead, Write};

use folio_core::{PortfolioValue, ValidationError};

use crate::error::CliError;

pub const PROMPT: &str = "Enter the value of your portfolio: ";
pub const NOT_A_NUMBER: &str = "That was not a number";
pub const TOO_SMALL: &str = "That number was too small";

/// Asks until a positive number is entered. End of input aborts.
pub fn read_portfolio_value<R, W>(mut input: R, mut output: W) -> Result<PortfolioValue, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(CliError::InputClosed);
        }

        match PortfolioValue::parse(&line) {
            Ok(value) => return Ok(value),
            Err(ValidationError::NonPositivePortfolioValue) => writeln!(output, "{TOO_SMALL}")?,
            Err(_) => writeln!(output, "{NOT_A_NUMBER}")?,
        }
    }
}
