use async_trait::async_trait;
use farewatch_core::{FareLookup, FareQuery, FareSnapshot, LookupError, TripType};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{error, info};

use crate::archive::SnapshotArchive;
use farewatch_store::app_config::LookupConfig;

/// Fetches the booking site's fare-search page through its deeplink URL.
pub struct DeeplinkFareLookup {
    client: Client,
    base_url: String,
    locale: String,
    adult_passengers: u32,
    timeout: Duration,
    archive: Option<SnapshotArchive>,
    archive_snapshots: bool,
}

impl DeeplinkFareLookup {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            locale: config.locale.clone(),
            adult_passengers: config.adult_passengers,
            timeout,
            archive: None,
            archive_snapshots: false,
        })
    }

    /// Attach an archive. Failure diagnostics are always written to it;
    /// successful snapshots only when `archive_snapshots` is set.
    pub fn with_archive(mut self, archive: SnapshotArchive, archive_snapshots: bool) -> Self {
        self.archive = Some(archive);
        self.archive_snapshots = archive_snapshots;
        self
    }

    pub fn build_url(&self, query: &FareQuery) -> Result<Url, LookupError> {
        let passengers = self.adult_passengers.to_string();
        let mut params = vec![
            ("originationAirportCode", query.origin.as_str()),
            ("destinationAirportCode", query.destination.as_str()),
            ("departureDate", query.depart_date.as_str()),
            ("tripType", query.trip_type.as_str()),
            ("adultPassengersCount", passengers.as_str()),
            ("reset", "true"),
        ];

        if query.trip_type == TripType::Roundtrip {
            let return_date = query
                .return_date
                .as_deref()
                .ok_or_else(|| LookupError::InvalidQuery("roundtrip without return date".to_string()))?;
            params.push(("returnDate", return_date));
        }

        Url::parse_with_params(&self.base_url, &params).map_err(|e| LookupError::InvalidQuery(e.to_string()))
    }

    async fn fetch(&self, url: &Url) -> Result<String, LookupError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, self.locale.as_str())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| self.request_error(e))
    }

    fn request_error(&self, e: reqwest::Error) -> LookupError {
        if e.is_timeout() {
            LookupError::Timeout(self.timeout.as_secs())
        } else {
            LookupError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl FareLookup for DeeplinkFareLookup {
    async fn lookup(&self, query: &FareQuery) -> Result<FareSnapshot, LookupError> {
        let url = self.build_url(query)?;
        info!("Navigating to: {}", url);

        match self.fetch(&url).await {
            Ok(body) => {
                if self.archive_snapshots {
                    if let Some(archive) = &self.archive {
                        archive.save_snapshot(&body).await;
                    }
                }
                Ok(FareSnapshot::new(url.as_str(), body))
            }
            Err(e) => {
                error!("Fare lookup failed for {}: {}", url, e);
                if let Some(archive) = &self.archive {
                    archive.save_diagnostic(url.as_str(), &e.to_string()).await;
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn query(trip_type: TripType, return_date: Option<&str>) -> FareQuery {
        FareQuery {
            trip_type,
            origin: "IND".to_string(),
            destination: "PHX".to_string(),
            depart_date: "2025-03-14".to_string(),
            return_date: return_date.map(String::from),
        }
    }

    fn config(base_url: &str, timeout_seconds: u64) -> LookupConfig {
        LookupConfig {
            base_url: base_url.to_string(),
            timeout_seconds,
            ..LookupConfig::default()
        }
    }

    /// Serves a single canned HTTP response, or hangs when `response` is None.
    async fn one_shot_server(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(body) => {
                    let _ = socket.write_all(body.as_bytes()).await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{}/air/booking/select.html", addr)
    }

    #[test]
    fn test_oneway_url() {
        let lookup = DeeplinkFareLookup::new(&LookupConfig::default()).unwrap();
        let url = lookup.build_url(&query(TripType::Oneway, None)).unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.southwest.com/air/booking/select.html?originationAirportCode=IND&destinationAirportCode=PHX&departureDate=2025-03-14&tripType=oneway&adultPassengersCount=1&reset=true"
        );
    }

    #[test]
    fn test_roundtrip_url_carries_return_date() {
        let lookup = DeeplinkFareLookup::new(&LookupConfig::default()).unwrap();
        let url = lookup.build_url(&query(TripType::Roundtrip, Some("2025-03-20"))).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("tripType".to_string(), "roundtrip".to_string())));
        assert!(pairs.contains(&("returnDate".to_string(), "2025-03-20".to_string())));

        assert!(matches!(
            lookup.build_url(&query(TripType::Roundtrip, None)),
            Err(LookupError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_returns_page_body() {
        let base = one_shot_server(Some(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 20\r\nConnection: close\r\n\r\n<p>Fare $129.99</p>\n",
        ))
        .await;
        let lookup = DeeplinkFareLookup::new(&config(&base, 5)).unwrap();

        let snapshot = lookup.lookup(&query(TripType::Oneway, None)).await.unwrap();

        assert_eq!(snapshot.body, "<p>Fare $129.99</p>\n");
        assert!(snapshot.url.contains("originationAirportCode=IND"));
    }

    #[tokio::test]
    async fn test_error_status_writes_diagnostic() {
        let base = one_shot_server(Some(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let archive = SnapshotArchive::new(vec![], dir.path().join("error_snapshot.txt"));
        let lookup = DeeplinkFareLookup::new(&config(&base, 5)).unwrap().with_archive(archive, false);

        let result = lookup.lookup(&query(TripType::Oneway, None)).await;

        assert!(matches!(result, Err(LookupError::Status { status: 503, .. })));
        let diagnostic = std::fs::read_to_string(dir.path().join("error_snapshot.txt")).unwrap();
        assert!(diagnostic.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_hung_site_times_out() {
        let base = one_shot_server(None).await;
        let lookup = DeeplinkFareLookup::new(&config(&base, 1)).unwrap();

        let result = lookup.lookup(&query(TripType::Oneway, None)).await;

        assert!(matches!(result, Err(LookupError::Timeout(1))));
    }
}
