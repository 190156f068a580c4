use std::io::{BufRead, Write};

use crate::{analysis::DEFAULT_DAY_COUNT, error::RatesError};

pub const DAY_COUNT_PROMPT: &str =
    "Enter the number of days to analyse or press Enter for the last 90 days: ";

/// Empty input selects the default window.
pub fn parse_day_count(input: &str) -> Result<u32, RatesError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(DEFAULT_DAY_COUNT);
    }

    match input.parse::<i64>() {
        Ok(days) if days > 0 => {
            u32::try_from(days).map_err(|_| RatesError::MalformedInput(input.to_owned()))
        }
        _ => Err(RatesError::MalformedInput(input.to_owned())),
    }
}

/// Prints the prompt and returns the answer line unparsed. Closed input is an error.
pub fn ask_day_count(mut input: impl BufRead, mut output: impl Write) -> eyre::Result<String> {
    write!(output, "{DAY_COUNT_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        eyre::bail!("input closed before a day count was entered");
    }

    Ok(line)
}
