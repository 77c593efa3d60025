use async_trait::async_trait;
use farewatch_core::{FlightRef, FlightStore, PriceUpdate, StoreError, TrackedFlight, UserRef};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// A stored document: the flight's raw fields, including derived ones.
pub type Document = HashMap<String, String>;

/// In-process flight store.
///
/// Keeps documents as flat string maps like the Redis backend, so records
/// round-trip through the same parsing. Every accepted write is recorded.
#[derive(Default)]
pub struct MemoryFlightStore {
    users: RwLock<BTreeMap<String, BTreeMap<String, Document>>>,
    writes: RwLock<Vec<(FlightRef, PriceUpdate)>>,
}

impl MemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a document for a user.
    pub async fn insert(&self, user_id: &str, flight_id: &str, fields: &[(&str, &str)]) {
        let doc: Document = fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.users
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(flight_id.to_string(), doc);
    }

    /// Register a user with an empty flight collection
    pub async fn add_user(&self, user_id: &str) {
        self.users.write().await.entry(user_id.to_string()).or_default();
    }

    pub async fn document(&self, user_id: &str, flight_id: &str) -> Option<Document> {
        self.users
            .read()
            .await
            .get(user_id)
            .and_then(|flights| flights.get(flight_id))
            .cloned()
    }

    pub async fn field(&self, user_id: &str, flight_id: &str, field: &str) -> Option<String> {
        self.document(user_id, flight_id)
            .await
            .and_then(|doc| doc.get(field).cloned())
    }

    pub async fn writes(&self) -> Vec<(FlightRef, PriceUpdate)> {
        self.writes.read().await.clone()
    }
}

#[async_trait]
impl FlightStore for MemoryFlightStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRef>, StoreError> {
        Ok(self.users.read().await.keys().cloned().map(UserRef).collect())
    }

    async fn list_flights(&self, user: &UserRef) -> Result<Vec<FlightRef>, StoreError> {
        let users = self.users.read().await;
        let flights = users
            .get(user.id())
            .ok_or_else(|| StoreError::NotFound(format!("users/{}", user)))?;
        Ok(flights.keys().map(|id| FlightRef::new(user, id.clone())).collect())
    }

    async fn read_flight(&self, flight: &FlightRef) -> Result<TrackedFlight, StoreError> {
        let doc = self
            .document(&flight.user_id, &flight.flight_id)
            .await
            .ok_or_else(|| StoreError::NotFound(flight.to_string()))?;
        TrackedFlight::from_fields(&flight.flight_id, &doc)
    }

    async fn update_flight(&self, flight: &FlightRef, update: &PriceUpdate) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let doc = users
            .get_mut(&flight.user_id)
            .and_then(|flights| flights.get_mut(&flight.flight_id))
            .ok_or_else(|| StoreError::NotFound(flight.to_string()))?;

        doc.insert("current".to_string(), update.current.clone());
        doc.insert("status".to_string(), update.status.as_str().to_string());
        self.writes.write().await.push((flight.clone(), update.clone()));
        Ok(())
    }
}
