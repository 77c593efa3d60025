use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::query::FareQuery;

/// Raw result of a fare search, handed straight to the extractor.
#[derive(Debug, Clone)]
pub struct FareSnapshot {
    pub url: String,
    pub body: String,
    pub captured_at: DateTime<Utc>,
}

impl FareSnapshot {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            captured_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Fare lookup timed out after {0}s")]
    Timeout(u64),
    #[error("Booking site returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Fare lookup request failed: {0}")]
    Request(String),
    #[error("Invalid fare search: {0}")]
    InvalidQuery(String),
}

#[async_trait]
pub trait FareLookup: Send + Sync {
    /// Retrieve the current fare-search results for a trip
    async fn lookup(&self, query: &FareQuery) -> Result<FareSnapshot, LookupError>;
}
