use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub redis_url: String,
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

fn default_app_id() -> String {
    "default-app-id".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_adult_passengers")]
    pub adult_passengers: u32,
}

fn default_base_url() -> String {
    "https://www.southwest.com/air/booking/select.html".to_string()
}
fn default_timeout_seconds() -> u64 { 60 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36".to_string()
}
fn default_locale() -> String { "en-US".to_string() }
fn default_adult_passengers() -> u32 { 1 }

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            locale: default_locale(),
            adult_passengers: default_adult_passengers(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractorConfig {
    #[serde(default = "default_fare_pattern")]
    pub fare_pattern: String,
    #[serde(default = "default_no_flights_pattern")]
    pub no_flights_pattern: String,
}

fn default_fare_pattern() -> String {
    r"\$\s*((?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]{1,2})?)".to_string()
}
fn default_no_flights_pattern() -> String {
    r"(?i)(no\s+flights\s+(are\s+)?available|there\s+are\s+no\s+flights|no\s+available\s+flights)".to_string()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fare_pattern: default_fare_pattern(),
            no_flights_pattern: default_no_flights_pattern(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub archive: bool,
    #[serde(default = "default_candidate_paths")]
    pub candidate_paths: Vec<String>,
    #[serde(default = "default_diagnostics_path")]
    pub diagnostics_path: String,
}

fn default_candidate_paths() -> Vec<String> {
    vec!["manual_search.html".to_string(), "/tmp/manual_search.html".to_string()]
}
fn default_diagnostics_path() -> String {
    "error_snapshot.txt".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            archive: false,
            candidate_paths: default_candidate_paths(),
            diagnostics_path: default_diagnostics_path(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            // Eg.. `FAREWATCH__STORE__APP_ID=my-app`
            .add_source(config::Environment::with_prefix("FAREWATCH").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let cfg: Config = config::Config::builder()
            .set_override("store.redis_url", "redis://127.0.0.1/")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.store.app_id, "default-app-id");
        assert_eq!(cfg.lookup.timeout_seconds, 60);
        assert_eq!(cfg.lookup.adult_passengers, 1);
        assert!(!cfg.snapshots.archive);
        assert_eq!(cfg.snapshots.candidate_paths.len(), 2);
    }

    #[test]
    fn test_missing_store_section_is_an_error() {
        let result: Result<Config, _> = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }
}
