use std::env;

use chrono::Local;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::ApiError;

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";

pub const DEFAULT_PROFILE: &str = "walking";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapboxCredentials {
    pub access_token: String,
    /// Directions profile, `walking` unless configured.
    pub profile: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl MapboxCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            profile: DEFAULT_PROFILE.to_owned(),
            rate_limit_per_minute: None,
            proxy: None,
        }
    }

    /// Reads `MAPBOX_ACCESS_TOKEN` and the optional `MAPBOX_PROFILE`,
    /// `MAPBOX_RATE_LIMIT` and `MAPBOX_PROXY`.
    pub fn env() -> Result<Self, ApiError> {
        let access_token = env::var("MAPBOX_ACCESS_TOKEN")
            .map_err(|_| ApiError::Other("Expected MAPBOX_ACCESS_TOKEN.".to_owned()))?;
        let profile = env::var("MAPBOX_PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE.to_owned());
        let rate_limit_per_minute = match env::var("MAPBOX_RATE_LIMIT") {
            Ok(value) => Some(value.parse().map_err(|_| {
                ApiError::Other(format!("Invalid MAPBOX_RATE_LIMIT '{value}'."))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            access_token,
            profile,
            rate_limit_per_minute,
            proxy: env::var("MAPBOX_PROXY").ok(),
        })
    }
}

struct MapboxClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

/// Shared HTTP access to the Mapbox APIs, with an optional per-minute
/// request budget.
pub struct MapboxClient {
    pub credentials: MapboxCredentials,
    base_url: String,
    http: reqwest::Client,
    state: RwLock<MapboxClientState>,
}

impl MapboxClient {
    pub fn new(credentials: &MapboxCredentials) -> Result<Self, ApiError> {
        Self::with_base_url(credentials, MAPBOX_API_URL)
    }

    pub fn with_base_url(credentials: &MapboxCredentials, base_url: &str) -> Result<Self, ApiError> {
        /* build the http client with optional proxy */
        let http = if let Some(proxy_url) = &credentials.proxy {
            debug!("Using proxy '{proxy_url}' for Mapbox requests.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            credentials: credentials.clone(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
            state: RwLock::new(MapboxClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: chrono::offset::Local::now(),
            }),
        })
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_minutes;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetches `endpoint` (relative to the API root) and returns the body of a
    /// successful response.
    pub async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        self.try_decrement_available_requests().await?;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting endpoint '{endpoint}'.");
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("access_token", self.credentials.access_token.as_str())])
            .send()
            .await?;

        /* check response */
        match response.status() {
            reqwest::StatusCode::OK => Ok(response.text().await?),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limit_is_enforced() {
        let credentials = MapboxCredentials {
            rate_limit_per_minute: Some(2),
            ..MapboxCredentials::new("token")
        };
        let client = MapboxClient::new(&credentials).unwrap();

        assert!(client.try_decrement_available_requests().await.is_ok());
        assert!(client.try_decrement_available_requests().await.is_ok());
        assert!(matches!(
            client.try_decrement_available_requests().await,
            Err(ApiError::RateLimitReached)
        ));
        assert_eq!(client.available_requests().await, 0);
    }

    #[tokio::test]
    async fn test_no_rate_limit_by_default() {
        let client = MapboxClient::new(&MapboxCredentials::new("token")).unwrap();
        for _ in 0..100 {
            assert!(client.try_decrement_available_requests().await.is_ok());
        }
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client =
            MapboxClient::with_base_url(&MapboxCredentials::new("token"), "http://localhost:9000/")
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
        assert_eq!(client.credentials.profile, "walking");
    }
}
