use farewatch_core::StoreError;

/// Conditions that abort a whole run. Everything else is handled per flight.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Flight store unavailable: {0}")]
    Store(#[from] StoreError),
}
