use serde::{Deserialize, Serialize};

use crate::flight::{TrackedFlight, TripType};

/// Parameters for a single fare search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareQuery {
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    pub return_date: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Round-trip search requires a return date")]
    MissingReturnDate,
}

impl FareQuery {
    pub fn from_flight(flight: &TrackedFlight) -> Result<Self, QueryError> {
        let origin = required(&flight.from, "from")?;
        let destination = required(&flight.to, "to")?;
        let depart_date = required(&flight.depart, "depart")?;

        let return_date = match flight.trip_type {
            TripType::Oneway => None,
            TripType::Roundtrip => {
                let date = flight
                    .return_date
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .ok_or(QueryError::MissingReturnDate)?;
                Some(date.to_string())
            }
        };

        Ok(Self {
            trip_type: flight.trip_type,
            origin,
            destination,
            depart_date,
            return_date,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, QueryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(QueryError::MissingField(field));
    }
    Ok(value.to_string())
}
