use std::sync::Arc;

use async_trait::async_trait;
use itertools::Itertools;
use model::Coordinate;
use serde::Deserialize;

use crate::{client::MapboxClient, ApiError, RoutingService};

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: Option<LineString>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    #[serde(default)]
    coordinates: Vec<Coordinate>,
}

/// Extracts the geometry of the first route of a Directions response.
///
/// A body without a usable first route fails with
/// [`ApiError::MissingGeometry`].
pub fn decode_route(body: &str) -> Result<Vec<Coordinate>, ApiError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    response
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.geometry)
        .map(|geometry| geometry.coordinates)
        .filter(|coordinates| !coordinates.is_empty())
        .ok_or(ApiError::MissingGeometry)
}

/// Mapbox Directions v5 client.
pub struct MapboxDirections {
    client: Arc<MapboxClient>,
}

impl MapboxDirections {
    pub fn new(client: Arc<MapboxClient>) -> Self {
        Self { client }
    }

    fn endpoint(&self, waypoints: &[Coordinate]) -> String {
        let coordinates = waypoints
            .iter()
            .map(|c| format!("{},{}", c.longitude, c.latitude))
            .join(";");
        format!(
            "directions/v5/mapbox/{}/{}",
            self.client.credentials.profile, coordinates
        )
    }
}

#[async_trait]
impl RoutingService for MapboxDirections {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ApiError> {
        let body = self
            .client
            .get_text(
                &self.endpoint(waypoints),
                &[("geometries", "geojson"), ("overview", "full")],
            )
            .await?;
        decode_route(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapboxCredentials;

    #[test]
    fn test_decode_first_route() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {
                    "distance": 1423.2,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-74.0, 40.0], [-74.001, 40.0005], [-74.01, 40.01]]
                    }
                },
                {
                    "geometry": { "type": "LineString", "coordinates": [[1.0, 1.0]] }
                }
            ],
            "waypoints": []
        }"#;
        let route = decode_route(body).unwrap();
        assert_eq!(
            route,
            vec![
                Coordinate::new(-74.0, 40.0),
                Coordinate::new(-74.001, 40.0005),
                Coordinate::new(-74.01, 40.01),
            ]
        );
    }

    #[test]
    fn test_missing_geometry_fails_closed() {
        for body in [
            r#"{"code":"NoRoute","message":"No route found","routes":[]}"#,
            r#"{"code":"Ok"}"#,
            r#"{"routes":[{"distance":3.0}]}"#,
            r#"{"routes":[{"geometry":{"type":"LineString","coordinates":[]}}]}"#,
        ] {
            assert!(
                matches!(decode_route(body), Err(ApiError::MissingGeometry)),
                "{body}"
            );
        }
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        assert!(matches!(decode_route("<html>"), Err(ApiError::JsonError(_))));
        assert!(matches!(
            decode_route(r#"{"routes":[{"geometry":{"coordinates":[["a","b"]]}}]}"#),
            Err(ApiError::JsonError(_))
        ));
    }

    #[test]
    fn test_endpoint_lists_waypoints_in_order() {
        let client = MapboxClient::new(&MapboxCredentials::new("token")).unwrap();
        let directions = MapboxDirections::new(Arc::new(client));
        let endpoint = directions.endpoint(&[
            Coordinate::new(-74.0, 40.0),
            Coordinate::new(-74.5, 40.25),
        ]);
        assert_eq!(endpoint, "directions/v5/mapbox/walking/-74,40;-74.5,40.25");
    }
}
