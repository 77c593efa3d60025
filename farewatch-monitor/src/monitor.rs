use farewatch_core::{
    classify, format_currency, parse_current, parse_paid, FareExtraction, FareLookup, FareQuery, FlightRef,
    FlightStatus, FlightStore, LookupError, PriceExtractor, PriceUpdate, UserRef,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::MonitorError;
use crate::outcome::{FlightOutcome, RunSummary};

/// Extra time granted beyond the lookup adapter's own timeout, so the
/// adapter gets to record its diagnostic before the hard bound fires.
const LOOKUP_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Hard bound on a single fare lookup
    pub lookup_timeout: Duration,
}

impl MonitorSettings {
    pub fn for_lookup_timeout(seconds: u64) -> Self {
        Self {
            lookup_timeout: Duration::from_secs(seconds) + LOOKUP_GRACE,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::for_lookup_timeout(60)
    }
}

/// Re-prices every tracked flight, one at a time.
pub struct PriceMonitor {
    store: Arc<dyn FlightStore>,
    lookup: Arc<dyn FareLookup>,
    extractor: Arc<dyn PriceExtractor>,
    settings: MonitorSettings,
}

impl PriceMonitor {
    pub fn new(
        store: Arc<dyn FlightStore>,
        lookup: Arc<dyn FareLookup>,
        extractor: Arc<dyn PriceExtractor>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            store,
            lookup,
            extractor,
            settings,
        }
    }

    /// Check every flight of every user.
    ///
    /// Only a failure to enumerate users aborts the run; per-user and
    /// per-flight failures are logged, counted and skipped.
    pub async fn run(&self) -> Result<RunSummary, MonitorError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("price_check", %run_id);
        self.run_all(RunSummary::new(run_id)).instrument(span).await
    }

    async fn run_all(&self, mut summary: RunSummary) -> Result<RunSummary, MonitorError> {
        info!("--- Starting price check ---");

        let users = self.store.list_users().await?;
        summary.users = users.len();

        for user in &users {
            self.check_user(user, &mut summary).await;
        }

        if summary.flights_examined == 0 {
            info!("No flights found in the database to check.");
        }

        summary.finish();
        info!(
            users = summary.users,
            examined = summary.flights_examined,
            updated = summary.updated,
            dropped = summary.dropped,
            higher = summary.higher,
            skipped = summary.skipped(),
            "--- Price check complete ---"
        );
        Ok(summary)
    }

    async fn check_user(&self, user: &UserRef, summary: &mut RunSummary) {
        info!("Processing flights for user: {}", user);

        let flights = match self.store.list_flights(user).await {
            Ok(flights) => flights,
            Err(e) => {
                error!("Could not list flights for user {}: {}", user, e);
                summary.user_failures += 1;
                return;
            }
        };

        for flight in &flights {
            summary.flights_examined += 1;
            let span = info_span!("flight", user = %flight.user_id, flight = %flight.flight_id);
            let outcome = self.check_flight(flight).instrument(span).await;
            summary.record(&outcome);
        }
    }

    /// Run the full lookup, extract, compare and write cycle for one flight.
    pub async fn check_flight(&self, flight_ref: &FlightRef) -> FlightOutcome {
        // 1. Load the record and turn it into search parameters
        let flight = match self.store.read_flight(flight_ref).await {
            Ok(flight) => flight,
            Err(e) => {
                error!("Could not read flight {}: {}", flight_ref, e);
                return FlightOutcome::Malformed(e.to_string());
            }
        };
        info!("Checking flight: {} on {}", flight.route(), flight.depart);

        let query = match FareQuery::from_flight(&flight) {
            Ok(query) => query,
            Err(e) => {
                warn!("Skipping flight {} ({} on {}): {}", flight_ref, flight.route(), flight.depart, e);
                return FlightOutcome::Malformed(e.to_string());
            }
        };

        // 2. Fetch current fares
        let snapshot = match tokio::time::timeout(self.settings.lookup_timeout, self.lookup.lookup(&query)).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(e)) => {
                error!("Fare lookup failed for {} on {}: {}", flight.route(), flight.depart, e);
                return FlightOutcome::LookupFailed(e.to_string());
            }
            Err(_) => {
                let e = LookupError::Timeout(self.settings.lookup_timeout.as_secs());
                error!("Fare lookup failed for {} on {}: {}", flight.route(), flight.depart, e);
                return FlightOutcome::LookupFailed(e.to_string());
            }
        };

        // 3. Extract the lowest fare
        let current_raw = match self.extractor.extract(&snapshot) {
            FareExtraction::Price(price) => price,
            other => {
                info!("Could not find a price. Status: {}. Skipping update.", other);
                return FlightOutcome::Inconclusive(other);
            }
        };

        // 4. Compare against what was paid
        let paid_raw = flight.paid_raw();
        let (current, paid) = match (parse_current(&current_raw), parse_paid(paid_raw)) {
            (Ok(current), Ok(paid)) => (current, paid),
            (Err(e), _) | (_, Err(e)) => {
                warn!(
                    "Error converting prices to numbers (current: '{}', paid: '{}'). Skipping. Error: {}",
                    current_raw, paid_raw, e
                );
                return FlightOutcome::Unparseable {
                    current: current_raw,
                    paid: paid_raw.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let status = classify(current, paid);
        match status {
            FlightStatus::Dropped => info!("PRICE DROPPED! You paid ${:.2}, current is ${:.2}", paid, current),
            _ => info!("Price is higher/same. You paid ${:.2}, current is ${:.2}", paid, current),
        }

        // 5. Write back
        let update = PriceUpdate {
            current: format_currency(current),
            status,
        };
        match self.store.update_flight(flight_ref, &update).await {
            Ok(()) => {
                info!("Successfully updated flight {}.", flight_ref);
                FlightOutcome::Updated(update)
            }
            Err(e) => {
                error!("ERROR updating flight {}: {}", flight_ref, e);
                FlightOutcome::WriteFailed(e.to_string())
            }
        }
    }
}
