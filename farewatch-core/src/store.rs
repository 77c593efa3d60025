use async_trait::async_trait;

use crate::flight::{FlightRef, PriceUpdate, TrackedFlight, UserRef};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Document store holding per-user collections of tracked flights.
#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Verify the store is reachable before any work starts
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<UserRef>, StoreError>;

    async fn list_flights(&self, user: &UserRef) -> Result<Vec<FlightRef>, StoreError>;

    async fn read_flight(&self, flight: &FlightRef) -> Result<TrackedFlight, StoreError>;

    /// Overwrite `current` and `status` on an existing document.
    /// Never creates a document.
    async fn update_flight(&self, flight: &FlightRef, update: &PriceUpdate) -> Result<(), StoreError>;
}
