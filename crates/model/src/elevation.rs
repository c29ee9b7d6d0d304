use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Elevation samples in meters, index-aligned with the path they were
/// computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ElevationProfile {
    pub elevations_m: Vec<f64>,
}

impl ElevationProfile {
    pub fn new(elevations_m: Vec<f64>) -> Self {
        Self { elevations_m }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elevations_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations_m.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.elevations_m
    }

    /// Whether this profile describes `path`. A profile of a different length
    /// is stale and must be treated as absent.
    pub fn has_data(&self, path: &[Coordinate]) -> bool {
        path.len() >= 2 && self.len() == path.len()
    }

    /// The profile if it is consistent with `path`.
    pub fn for_path(&self, path: &[Coordinate]) -> Option<&Self> {
        self.has_data(path).then_some(self)
    }

    /// Elevation at `index`, 0 when unknown.
    pub fn at(&self, index: usize) -> f64 {
        self.elevations_m.get(index).copied().unwrap_or(0.0)
    }
}

impl From<Vec<f64>> for ElevationProfile {
    fn from(elevations_m: Vec<f64>) -> Self {
        Self::new(elevations_m)
    }
}

#[cfg(test)]
mod tests {
    use super::ElevationProfile;
    use crate::Coordinate;

    #[test]
    fn test_has_data_requires_matching_length() {
        let path = vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001)];
        assert!(ElevationProfile::new(vec![1.0, 2.0]).has_data(&path));
        assert!(!ElevationProfile::new(vec![1.0]).has_data(&path));
        assert!(!ElevationProfile::new(vec![1.0, 2.0, 3.0]).has_data(&path));
        assert!(!ElevationProfile::new(vec![1.0]).has_data(&path[..1]));
    }

    #[test]
    fn test_missing_samples_read_as_zero() {
        let profile = ElevationProfile::new(vec![12.5]);
        assert_eq!(profile.at(0), 12.5);
        assert_eq!(profile.at(3), 0.0);
    }
}
