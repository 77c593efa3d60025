pub mod flight;
pub mod query;
pub mod pricing;
pub mod store;
pub mod lookup;
pub mod extractor;

pub use flight::{FlightRef, FlightStatus, PriceUpdate, TrackedFlight, TripType, UserRef};
pub use query::{FareQuery, QueryError};
pub use pricing::{classify, format_currency, parse_current, parse_paid, PriceParseError};
pub use store::{FlightStore, StoreError};
pub use lookup::{FareLookup, FareSnapshot, LookupError};
pub use extractor::{FareExtraction, PriceExtractor};
