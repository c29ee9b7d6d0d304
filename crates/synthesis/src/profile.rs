use model::{elevation::ElevationProfile, geometry::distance, pace::PaceConfig, Coordinate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{export::ExportError, pace::variable_pace};

pub const CSV_HEADER: [&str; 3] = ["distance_km", "pace_min_per_km", "elevation_m"];

/// One sample of the elevation and pace charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow {
    /// Distance covered up to this point.
    pub distance_km: f64,
    pub pace_min_per_km: f64,
    pub elevation_m: f64,
}

/// Chart series for `path`, one row per point.
///
/// Empty unless `elevations` matches the path.
pub fn profile_series(
    path: &[Coordinate],
    elevations: &ElevationProfile,
    pace: &PaceConfig,
) -> Vec<ProfileRow> {
    let Some(elevations) = elevations.for_path(path) else {
        return Vec::new();
    };
    let paces = variable_pace(path, pace.pace_min_per_km, pace.variability_percent);

    let mut distance_m = 0.0;
    path.iter()
        .enumerate()
        .map(|(i, coordinate)| {
            if i > 0 {
                distance_m += distance(&path[i - 1], coordinate);
            }
            ProfileRow {
                distance_km: distance_m / 1000.0,
                pace_min_per_km: paces[i],
                elevation_m: elevations.at(i),
            }
        })
        .collect()
}

pub fn to_csv(rows: &[ProfileRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(&[
            row.distance_km.to_string(),
            row.pace_min_per_km.to_string(),
            row.elevation_m.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use model::geometry::path_length;

    use super::*;

    fn path() -> Vec<Coordinate> {
        vec![
            Coordinate::new(-74.0, 40.0),
            Coordinate::new(-74.0, 40.01),
            Coordinate::new(-74.01, 40.01),
        ]
    }

    #[test]
    fn test_inconsistent_data_has_no_series() {
        let path = path();
        let pace = PaceConfig::default();
        assert!(profile_series(&path, &ElevationProfile::empty(), &pace).is_empty());
        assert!(profile_series(&path, &ElevationProfile::new(vec![1.0, 2.0]), &pace).is_empty());
        assert!(profile_series(&path[..1], &ElevationProfile::new(vec![1.0]), &pace).is_empty());
    }

    #[test]
    fn test_series_uses_cumulative_distance() {
        let path = path();
        let rows = profile_series(
            &path,
            &ElevationProfile::new(vec![5.0, 7.0, 6.0]),
            &PaceConfig::new(6.0, 0.0),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].distance_km, 0.0);
        assert_relative_eq!(rows[2].distance_km, path_length(&path) / 1000.0, max_relative = 1e-12);
        assert!(rows.iter().all(|row| row.pace_min_per_km == 6.0));
        assert_eq!(rows[1].elevation_m, 7.0);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let rows = [
            ProfileRow {
                distance_km: 0.0,
                pace_min_per_km: 5.5,
                elevation_m: 10.0,
            },
            ProfileRow {
                distance_km: 1.25,
                pace_min_per_km: 5.75,
                elevation_m: 12.5,
            },
        ];
        let csv = to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec!["distance_km,pace_min_per_km,elevation_m", "0,5.5,10", "1.25,5.75,12.5"]
        );
    }
}
