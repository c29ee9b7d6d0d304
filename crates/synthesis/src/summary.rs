use chrono::Duration;
use model::{
    elevation::ElevationProfile, geometry::path_length, pace::PaceConfig, summary::RouteSummary,
    Coordinate,
};

use crate::{elevation::elevation_gain, pace::variable_pace};

/// Derived metrics of `path` at the configured pace.
///
/// Duration is distance at the nominal pace. Elevation gain only counts when
/// `elevations` matches the path.
pub fn summarize(path: &[Coordinate], elevations: &ElevationProfile, pace: &PaceConfig) -> RouteSummary {
    let distance_m = path_length(path);
    let seconds = distance_m / 1000.0 * pace.pace_min_per_km * 60.0;

    let paces = variable_pace(path, pace.pace_min_per_km, pace.variability_percent);
    let average_pace_min_per_km = if paces.is_empty() {
        pace.pace_min_per_km
    } else {
        paces.iter().sum::<f64>() / paces.len() as f64
    };

    RouteSummary {
        distance_m,
        duration: Duration::milliseconds((seconds * 1000.0) as i64),
        elevation_gain_m: elevations
            .for_path(path)
            .map_or(0.0, |profile| elevation_gain(profile.as_slice())),
        average_pace_min_per_km,
        point_count: path.len(),
    }
}
