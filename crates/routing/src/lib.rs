use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::Coordinate;

pub mod client;
pub mod directions;
pub mod tilequery;

pub use client::{MapboxClient, MapboxCredentials};
pub use directions::MapboxDirections;
pub use tilequery::MapboxTerrain;

/// Most waypoints a single routing request may carry.
pub const MAX_WAYPOINTS: usize = 25;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    MissingGeometry,
    RateLimitReached,
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::MissingGeometry => write!(f, "Response contains no route geometry."),
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

/// Snaps an ordered list of waypoints onto the road network.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Returns the road-following path through `waypoints`, usually much
    /// denser than the input.
    async fn route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ApiError>;
}

/// Terrain height lookup.
#[async_trait]
pub trait TerrainService: Send + Sync {
    /// Height in meters at `coordinate`, `None` when the terrain is unknown.
    async fn elevation(&self, coordinate: Coordinate) -> Result<Option<f64>, ApiError>;
}

#[async_trait]
impl<T: RoutingService + ?Sized> RoutingService for Arc<T> {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ApiError> {
        (**self).route(waypoints).await
    }
}

#[async_trait]
impl<T: TerrainService + ?Sized> TerrainService for Arc<T> {
    async fn elevation(&self, coordinate: Coordinate) -> Result<Option<f64>, ApiError> {
        (**self).elevation(coordinate).await
    }
}
