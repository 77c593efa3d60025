use farewatch_core::{FlightRef, UserRef};

/// Key layout for flight documents, scoped under an application id.
///
/// Mirrors the document hierarchy `artifacts/{app}/users/{user}/flights/{flight}`
/// with `:` as the Redis separator.
#[derive(Debug, Clone)]
pub struct DocumentPaths {
    app_id: String,
}

impl DocumentPaths {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self { app_id: app_id.into() }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn users_key(&self) -> String {
        format!("artifacts:{}:users", self.app_id)
    }

    pub fn flights_key(&self, user: &UserRef) -> String {
        format!("artifacts:{}:users:{}:flights", self.app_id, user.id())
    }

    pub fn flight_key(&self, flight: &FlightRef) -> String {
        format!("artifacts:{}:users:{}:flights:{}", self.app_id, flight.user_id, flight.flight_id)
    }

    /// Human readable path used in log lines
    pub fn document_path(&self, flight: &FlightRef) -> String {
        format!("artifacts/{}/{}", self.app_id, flight)
    }
}
