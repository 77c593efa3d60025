use chrono::{DateTime, Utc};
use farewatch_core::{FareExtraction, FlightStatus, PriceUpdate};
use serde::Serialize;
use uuid::Uuid;

/// What happened to one flight during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightOutcome {
    Updated(PriceUpdate),
    /// Record could not be read or does not describe a searchable trip
    Malformed(String),
    LookupFailed(String),
    /// Extractor gave no usable price; prior status is left alone
    Inconclusive(FareExtraction),
    Unparseable {
        current: String,
        paid: String,
        reason: String,
    },
    WriteFailed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub users: usize,
    pub user_failures: usize,
    pub flights_examined: usize,
    pub updated: usize,
    pub dropped: usize,
    pub higher: usize,
    pub malformed: usize,
    pub lookup_failures: usize,
    pub inconclusive: usize,
    pub unparseable: usize,
    pub write_failures: usize,
}

impl RunSummary {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            users: 0,
            user_failures: 0,
            flights_examined: 0,
            updated: 0,
            dropped: 0,
            higher: 0,
            malformed: 0,
            lookup_failures: 0,
            inconclusive: 0,
            unparseable: 0,
            write_failures: 0,
        }
    }

    pub fn record(&mut self, outcome: &FlightOutcome) {
        match outcome {
            FlightOutcome::Updated(update) => {
                self.updated += 1;
                match update.status {
                    FlightStatus::Dropped => self.dropped += 1,
                    FlightStatus::Higher => self.higher += 1,
                    FlightStatus::Monitoring => {}
                }
            }
            FlightOutcome::Malformed(_) => self.malformed += 1,
            FlightOutcome::LookupFailed(_) => self.lookup_failures += 1,
            FlightOutcome::Inconclusive(_) => self.inconclusive += 1,
            FlightOutcome::Unparseable { .. } => self.unparseable += 1,
            FlightOutcome::WriteFailed(_) => self.write_failures += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.flights_examined - self.updated
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::new(Uuid::new_v4());
        let outcomes = [
            FlightOutcome::Updated(PriceUpdate { current: "$1.00".into(), status: FlightStatus::Dropped }),
            FlightOutcome::Updated(PriceUpdate { current: "$9.00".into(), status: FlightStatus::Higher }),
            FlightOutcome::Inconclusive(FareExtraction::NoFlights),
            FlightOutcome::LookupFailed("timeout".into()),
        ];
        for outcome in &outcomes {
            summary.flights_examined += 1;
            summary.record(outcome);
        }

        assert_eq!(summary.updated, 2);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.higher, 1);
        assert_eq!(summary.inconclusive, 1);
        assert_eq!(summary.lookup_failures, 1);
        assert_eq!(summary.skipped(), 2);
    }
}
