use async_trait::async_trait;
use farewatch_core::{FlightRef, FlightStore, PriceUpdate, StoreError, TrackedFlight, UserRef};
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::paths::DocumentPaths;

/// Flight documents kept as Redis hashes, with sets indexing users and
/// each user's flights.
#[derive(Clone)]
pub struct RedisFlightStore {
    client: redis::Client,
    paths: DocumentPaths,
}

impl RedisFlightStore {
    pub fn new(connection_string: &str, app_id: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string).map_err(connection_error)?;
        Ok(Self {
            client,
            paths: DocumentPaths::new(app_id),
        })
    }

    pub fn paths(&self) -> &DocumentPaths {
        &self.paths
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)
    }
}

fn connection_error(e: redis::RedisError) -> StoreError {
    StoreError::Connection(e.to_string())
}

fn backend_error(e: redis::RedisError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl FlightStore for RedisFlightStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(connection_error)?;
        info!("Connected to flight store (app: {})", self.paths.app_id());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRef>, StoreError> {
        let mut conn = self.connection().await?;
        let mut ids: Vec<String> = conn.smembers(self.paths.users_key()).await.map_err(backend_error)?;
        // Sets are unordered; keep runs reproducible
        ids.sort();
        Ok(ids.into_iter().map(UserRef).collect())
    }

    async fn list_flights(&self, user: &UserRef) -> Result<Vec<FlightRef>, StoreError> {
        let mut conn = self.connection().await?;
        let mut ids: Vec<String> = conn
            .smembers(self.paths.flights_key(user))
            .await
            .map_err(backend_error)?;
        ids.sort();
        Ok(ids.into_iter().map(|id| FlightRef::new(user, id)).collect())
    }

    async fn read_flight(&self, flight: &FlightRef) -> Result<TrackedFlight, StoreError> {
        let mut conn = self.connection().await?;
        let key = self.paths.flight_key(flight);
        let fields: HashMap<String, String> = conn.hgetall(&key).await.map_err(backend_error)?;

        if fields.is_empty() {
            return Err(StoreError::NotFound(self.paths.document_path(flight)));
        }
        TrackedFlight::from_fields(&flight.flight_id, &fields)
    }

    async fn update_flight(&self, flight: &FlightRef, update: &PriceUpdate) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let key = self.paths.flight_key(flight);

        // Only touch documents that already exist; HSET alone would create one.
        let script = redis::Script::new(
            r#"
            if redis.call("EXISTS", KEYS[1]) == 1 then
                return redis.call("HSET", KEYS[1], ARGV[1], ARGV[2], ARGV[3], ARGV[4])
            else
                return nil
            end
        "#,
        );

        let written: Option<i64> = script
            .key(&key)
            .arg("current")
            .arg(&update.current)
            .arg("status")
            .arg(update.status.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(backend_error)?;

        match written {
            Some(_) => {
                debug!("Updated {} -> {} ({})", key, update.current, update.status);
                Ok(())
            }
            None => Err(StoreError::NotFound(self.paths.document_path(flight))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        let result = RedisFlightStore::new("not a redis url", "app");
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[test]
    fn test_new_does_not_connect() {
        // Opening a client is lazy; nothing listens on this port
        let store = RedisFlightStore::new("redis://127.0.0.1:1/", "app").unwrap();
        assert_eq!(store.paths().app_id(), "app");
    }
}
