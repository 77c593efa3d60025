pub mod error;
pub mod outcome;
pub mod monitor;

pub use error::MonitorError;
pub use monitor::{MonitorSettings, PriceMonitor};
pub use outcome::{FlightOutcome, RunSummary};
