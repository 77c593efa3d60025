use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::store::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TripType {
    #[default]
    Oneway,
    Roundtrip,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Oneway => "oneway",
            TripType::Roundtrip => "roundtrip",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oneway" => Ok(TripType::Oneway),
            "roundtrip" => Ok(TripType::Roundtrip),
            other => Err(format!("unknown trip type '{}'", other)),
        }
    }
}

impl TryFrom<String> for TripType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TripType> for String {
    fn from(value: TripType) -> Self {
        value.as_str().to_string()
    }
}

/// Derived classification written back after every successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Monitoring,
    Dropped,
    Higher,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Monitoring => "monitoring",
            FlightStatus::Dropped => "dropped",
            FlightStatus::Higher => "higher",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's saved itinerary together with the fare originally paid.
///
/// `current` and `status` live on the same document but are outputs of the
/// monitor, so they are not part of this model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFlight {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub trip_type: TripType,
    pub from: String,
    pub to: String,
    pub depart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<String>,
}

impl TrackedFlight {
    /// Build a flight from the flat string fields of a stored document.
    pub fn from_fields(id: &str, fields: &HashMap<String, String>) -> Result<Self, StoreError> {
        let map: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        let mut flight: TrackedFlight = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| StoreError::Malformed {
                path: id.to_string(),
                reason: e.to_string(),
            })?;
        flight.id = id.to_string();
        Ok(flight)
    }

    /// The stored paid amount, `"0"` when the field is absent.
    pub fn paid_raw(&self) -> &str {
        self.paid.as_deref().unwrap_or("0")
    }

    pub fn route(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserRef(pub String);

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a flight document: owning user plus document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightRef {
    pub user_id: String,
    pub flight_id: String,
}

impl FlightRef {
    pub fn new(user: &UserRef, flight_id: impl Into<String>) -> Self {
        Self {
            user_id: user.0.clone(),
            flight_id: flight_id.into(),
        }
    }
}

impl fmt::Display for FlightRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/flights/{}", self.user_id, self.flight_id)
    }
}

/// The only write the monitor performs on a flight document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub current: String,
    pub status: FlightStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_fields_defaults_to_oneway() {
        let flight = TrackedFlight::from_fields(
            "abc",
            &fields(&[("from", "IND"), ("to", "PHX"), ("depart", "2025-03-14"), ("paid", "200.00")]),
        )
        .unwrap();

        assert_eq!(flight.id, "abc");
        assert_eq!(flight.trip_type, TripType::Oneway);
        assert_eq!(flight.return_date, None);
        assert_eq!(flight.route(), "IND -> PHX");
    }

    #[test]
    fn test_from_fields_ignores_derived_fields() {
        let flight = TrackedFlight::from_fields(
            "rt-1",
            &fields(&[
                ("tripType", "RoundTrip"),
                ("from", "DAL"),
                ("to", "HOU"),
                ("depart", "2025-05-01"),
                ("returnDate", "2025-05-04"),
                ("current", "$99.00"),
                ("status", "dropped"),
            ]),
        )
        .unwrap();

        assert_eq!(flight.trip_type, TripType::Roundtrip);
        assert_eq!(flight.return_date.as_deref(), Some("2025-05-04"));
        assert_eq!(flight.paid_raw(), "0");
    }

    #[test]
    fn test_from_fields_missing_route_is_malformed() {
        let result = TrackedFlight::from_fields("x", &fields(&[("from", "IND")]));
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_trip_type_is_malformed() {
        let result = TrackedFlight::from_fields(
            "x",
            &fields(&[("tripType", "multicity"), ("from", "A"), ("to", "B"), ("depart", "d")]),
        );
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&FlightStatus::Dropped).unwrap(), "\"dropped\"");
        assert_eq!(FlightStatus::Higher.to_string(), "higher");
    }
}
