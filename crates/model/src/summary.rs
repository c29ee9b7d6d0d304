use chrono::Duration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// Derived metrics of the current route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_m: f64,
    /// Time needed at the nominal pace.
    #[serde(with = "utility::serde::duration")]
    #[schemars(schema_with = "utility::serde::duration::schema")]
    pub duration: Duration,
    pub elevation_gain_m: f64,
    pub average_pace_min_per_km: f64,
    pub point_count: usize,
}

impl ExampleData for RouteSummary {
    fn example_data() -> Self {
        Self {
            distance_m: 5230.0,
            duration: Duration::seconds(1726),
            elevation_gain_m: 42.0,
            average_pace_min_per_km: 5.5,
            point_count: 118,
        }
    }
}
