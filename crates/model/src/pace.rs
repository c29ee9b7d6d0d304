use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

pub const MIN_PACE_MIN_PER_KM: f64 = 3.0;
pub const MAX_PACE_MIN_PER_KM: f64 = 10.0;
pub const DEFAULT_PACE_MIN_PER_KM: f64 = 5.5;

pub const MIN_VARIABILITY_PERCENT: f64 = 0.0;
pub const MAX_VARIABILITY_PERCENT: f64 = 50.0;
pub const DEFAULT_VARIABILITY_PERCENT: f64 = 15.0;

/// Target pace and how much the synthesized pace may wander around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaceConfig {
    /// Minutes per kilometer.
    pub pace_min_per_km: f64,
    /// Amplitude of the pace variation relative to the target pace.
    pub variability_percent: f64,
}

impl PaceConfig {
    /// Builds a config with both values clamped into their bounds.
    pub fn new(pace_min_per_km: f64, variability_percent: f64) -> Self {
        Self {
            pace_min_per_km: clamp_pace(pace_min_per_km),
            variability_percent: clamp_variability(variability_percent),
        }
    }

    pub fn with_pace(self, pace_min_per_km: f64) -> Self {
        Self::new(pace_min_per_km, self.variability_percent)
    }

    pub fn with_variability(self, variability_percent: f64) -> Self {
        Self::new(self.pace_min_per_km, variability_percent)
    }
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            pace_min_per_km: DEFAULT_PACE_MIN_PER_KM,
            variability_percent: DEFAULT_VARIABILITY_PERCENT,
        }
    }
}

impl ExampleData for PaceConfig {
    fn example_data() -> Self {
        Self::default()
    }
}

fn clamp_pace(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_PACE_MIN_PER_KM
    } else {
        value.clamp(MIN_PACE_MIN_PER_KM, MAX_PACE_MIN_PER_KM)
    }
}

fn clamp_variability(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_VARIABILITY_PERCENT
    } else {
        value.clamp(MIN_VARIABILITY_PERCENT, MAX_VARIABILITY_PERCENT)
    }
}
