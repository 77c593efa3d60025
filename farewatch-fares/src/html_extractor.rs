use farewatch_core::{FareExtraction, FareSnapshot, PriceExtractor};
use regex::Regex;
use tracing::debug;

use farewatch_store::app_config::ExtractorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("Invalid {name} pattern: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Picks the lowest advertised fare out of a fare-search page.
pub struct HtmlPriceExtractor {
    fare: Regex,
    no_flights: Regex,
}

impl HtmlPriceExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        let fare = Regex::new(&config.fare_pattern)
            .map_err(|source| ExtractorError::Pattern { name: "fare", source })?;
        let no_flights = Regex::new(&config.no_flights_pattern)
            .map_err(|source| ExtractorError::Pattern { name: "no-flights", source })?;
        Ok(Self { fare, no_flights })
    }

    /// Parse one fare match. Uses the first capture group when the pattern has one.
    fn amount(&self, caps: &regex::Captures<'_>) -> Option<f64> {
        let text = caps.get(1).or_else(|| caps.get(0))?.as_str();
        text.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
    }
}

impl PriceExtractor for HtmlPriceExtractor {
    fn extract(&self, snapshot: &FareSnapshot) -> FareExtraction {
        if self.no_flights.is_match(&snapshot.body) {
            return FareExtraction::NoFlights;
        }

        let lowest = self
            .fare
            .captures_iter(&snapshot.body)
            .filter_map(|caps| self.amount(&caps))
            .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))));

        match lowest {
            Some(price) => {
                debug!("Lowest fare on {}: {:.2}", snapshot.url, price);
                FareExtraction::Price(format!("{:.2}", price))
            }
            None => FareExtraction::NotFound,
        }
    }
}
