use model::{
    geometry::{circle_shape, heart_shape, ShapeKind, DEFAULT_CIRCLE_RADIUS_KM, DEFAULT_HEART_SIZE},
    pace::PaceConfig,
    Coordinate, Path,
};
use routing::MAX_WAYPOINTS;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use synthesis::elevation::DEFAULT_CONCURRENCY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Longest path that may be sent to the routing service.
    pub waypoint_cap: usize,
    pub circle_radius_km: f64,
    pub heart_size: f64,
    pub elevation_concurrency: usize,
    pub pace: PaceConfig,
    pub markers_visible: bool,
}

impl PlannerConfig {
    pub fn shape(&self, kind: ShapeKind, center: Coordinate, zoom: f64) -> Path {
        match kind {
            ShapeKind::Circle => circle_shape(center, zoom, self.circle_radius_km),
            ShapeKind::Heart => heart_shape(center, zoom, self.heart_size),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            waypoint_cap: MAX_WAYPOINTS,
            circle_radius_km: DEFAULT_CIRCLE_RADIUS_KM,
            heart_size: DEFAULT_HEART_SIZE,
            elevation_concurrency: DEFAULT_CONCURRENCY,
            pace: PaceConfig::default(),
            markers_visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlannerConfig;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"waypointCap": 10}"#).unwrap();
        assert_eq!(config.waypoint_cap, 10);
        assert_eq!(config.elevation_concurrency, 16);
        assert_eq!(config.circle_radius_km, 1.0);
        assert!(config.markers_visible);
    }
}
