use std::sync::Arc;

use async_trait::async_trait;
use model::Coordinate;
use serde::Deserialize;

use crate::{client::MapboxClient, ApiError, TerrainService};

pub const TERRAIN_TILESET: &str = "mapbox.mapbox-terrain-v2";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: ContourProperties,
}

#[derive(Debug, Default, Deserialize)]
struct ContourProperties {
    ele: Option<f64>,
}

/// Highest contour elevation in a Tilequery response, if any.
pub fn decode_elevation(body: &str) -> Result<Option<f64>, ApiError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(collection
        .features
        .into_iter()
        .filter_map(|feature| feature.properties.ele)
        .reduce(f64::max))
}

/// Terrain heights from the contour layer of the Mapbox terrain tileset.
pub struct MapboxTerrain {
    client: Arc<MapboxClient>,
}

impl MapboxTerrain {
    pub fn new(client: Arc<MapboxClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TerrainService for MapboxTerrain {
    async fn elevation(&self, coordinate: Coordinate) -> Result<Option<f64>, ApiError> {
        let endpoint = format!(
            "v4/{TERRAIN_TILESET}/tilequery/{},{}.json",
            coordinate.longitude, coordinate.latitude
        );
        let body = self
            .client
            .get_text(&endpoint, &[("layers", "contour"), ("limit", "50")])
            .await?;
        decode_elevation(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_contour_wins() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "ele": 20, "index": 5, "tilequery": { "layer": "contour" } } },
                { "type": "Feature", "properties": { "ele": 30 } },
                { "type": "Feature", "properties": { "ele": 10 } }
            ]
        }"#;
        assert_eq!(decode_elevation(body).unwrap(), Some(30.0));
    }

    #[test]
    fn test_no_contours_is_unknown() {
        assert_eq!(
            decode_elevation(r#"{"type":"FeatureCollection","features":[]}"#).unwrap(),
            None
        );
        assert_eq!(
            decode_elevation(r#"{"features":[{"properties":{}}, {}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        assert!(matches!(
            decode_elevation(r#"{"features": 3}"#),
            Err(ApiError::JsonError(_))
        ));
    }
}
