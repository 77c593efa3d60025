use std::fmt;

use crate::lookup::FareSnapshot;

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const NO_FLIGHTS: &str = "NO_FLIGHTS";

/// Outcome of pulling a single lowest fare out of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FareExtraction {
    /// Numeric price, still in text form
    Price(String),
    NotFound,
    NoFlights,
    Unrecognized(String),
}

impl FareExtraction {
    /// Map one line of extractor output onto an outcome.
    pub fn from_line(line: &str) -> Self {
        let line = line.trim();
        match line {
            NOT_FOUND => FareExtraction::NotFound,
            NO_FLIGHTS => FareExtraction::NoFlights,
            "" => FareExtraction::Unrecognized(String::new()),
            other if other.parse::<f64>().is_ok() => FareExtraction::Price(other.to_string()),
            other => FareExtraction::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for FareExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareExtraction::Price(p) => f.write_str(p),
            FareExtraction::NotFound => f.write_str(NOT_FOUND),
            FareExtraction::NoFlights => f.write_str(NO_FLIGHTS),
            FareExtraction::Unrecognized(raw) => write!(f, "unrecognized({:?})", raw),
        }
    }
}

pub trait PriceExtractor: Send + Sync {
    fn extract(&self, snapshot: &FareSnapshot) -> FareExtraction;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line() {
        assert_eq!(FareExtraction::from_line("150.00\n"), FareExtraction::Price("150.00".to_string()));
        assert_eq!(FareExtraction::from_line("NOT_FOUND"), FareExtraction::NotFound);
        assert_eq!(FareExtraction::from_line(" NO_FLIGHTS "), FareExtraction::NoFlights);
        assert_eq!(
            FareExtraction::from_line("Traceback (most recent call last)"),
            FareExtraction::Unrecognized("Traceback (most recent call last)".to_string())
        );
        assert_eq!(FareExtraction::from_line(""), FareExtraction::Unrecognized(String::new()));
    }
}
