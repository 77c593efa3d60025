pub mod app_config;
pub mod paths;
pub mod flight_repo;
pub mod memory;

pub use app_config::Config;
pub use paths::DocumentPaths;
pub use flight_repo::RedisFlightStore;
pub use memory::MemoryFlightStore;
