use crate::flight::FlightStatus;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PriceParseError {
    #[error("empty price value")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is not a finite, non-negative amount")]
    OutOfRange(String),
}

/// Parse the current fare reported by the extractor.
pub fn parse_current(raw: &str) -> Result<f64, PriceParseError> {
    parse_amount(raw.trim())
}

/// Parse a stored paid amount.
///
/// Only the leading whitespace-delimited token counts, so values such as
/// `"145.98 or 8500 pts"` resolve to `145.98`.
pub fn parse_paid(raw: &str) -> Result<f64, PriceParseError> {
    let token = raw.split_whitespace().next().ok_or(PriceParseError::Empty)?;
    parse_amount(token)
}

fn parse_amount(token: &str) -> Result<f64, PriceParseError> {
    if token.is_empty() {
        return Err(PriceParseError::Empty);
    }
    let value: f64 = token
        .parse()
        .map_err(|_| PriceParseError::NotANumber(token.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(PriceParseError::OutOfRange(token.to_string()));
    }
    Ok(value)
}

/// Strict comparison; an unchanged fare lands in `Higher`.
pub fn classify(current: f64, paid: f64) -> FlightStatus {
    if current < paid {
        FlightStatus::Dropped
    } else {
        FlightStatus::Higher
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}
