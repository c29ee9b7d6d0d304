use std::{error, fmt, io, sync::Arc};

use itertools::izip;
use model::{
    elevation::ElevationProfile,
    pace::PaceConfig,
    run::RunMetadata,
    track::{Track, TrackDocument, TrackMetadata, TrackPoint, TrackSegment, RUNNING_ACTIVITY},
    Coordinate,
};

use crate::{gpx::TrackSerializer, pace::variable_pace, timing::timestamps};

#[derive(Debug, Clone)]
pub enum ExportError {
    Io(Arc<io::Error>),
    Csv(Arc<csv::Error>),
    Gpx(String),
    Other(String),
}

impl error::Error for ExportError {}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Failed to write track: {}", e),
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Gpx(e) => write!(f, "GPX error: {}", e),
            ExportError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(Arc::new(e))
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(Arc::new(e))
    }
}

/// A serialized track ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct TrackExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub payload: Vec<u8>,
}

/// Assembles the timed track of `path`.
///
/// Elevations are taken from `elevations` only when it matches the path,
/// otherwise every point sits at 0 m. Timestamps start at the run's local
/// start time and never decrease.
pub fn build_track(
    path: &[Coordinate],
    elevations: &ElevationProfile,
    pace: &PaceConfig,
    metadata: &RunMetadata,
) -> TrackDocument {
    let start = metadata.start_instant();
    let paces = variable_pace(path, pace.pace_min_per_km, pace.variability_percent);
    let times = timestamps(path, &paces, start);
    let elevations = elevations.for_path(path);

    let points = izip!(0.., path, times)
        .map(|(i, coordinate, time)| TrackPoint {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            elevation_m: elevations.map_or(0.0, |profile| profile.at(i)),
            time,
        })
        .collect();

    TrackDocument {
        metadata: TrackMetadata {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            time: start,
        },
        track: Track {
            name: metadata.name.clone(),
            activity_type: RUNNING_ACTIVITY.to_owned(),
            segment: TrackSegment { points },
        },
    }
}

/// File name for a run called `name`: anything but ASCII letters and digits
/// becomes `_`, the result is lower-cased and gets `extension` appended.
pub fn export_file_name(name: &str, extension: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.{}", stem, extension)
}

/// Builds the track and serializes it with `serializer`.
pub fn export_track<S>(
    serializer: &S,
    path: &[Coordinate],
    elevations: &ElevationProfile,
    pace: &PaceConfig,
    metadata: &RunMetadata,
) -> Result<TrackExport, ExportError>
where
    S: TrackSerializer + ?Sized,
{
    let document = build_track(path, elevations, pace, metadata);
    let payload = serializer.serialize(&document)?;
    Ok(TrackExport {
        file_name: export_file_name(&metadata.name, serializer.extension()),
        content_type: serializer.content_type(),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use model::geometry::path_length;

    use super::*;
    use crate::gpx::GpxWriter;

    fn metadata() -> RunMetadata {
        RunMetadata {
            name: "Morning Run".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            description: Some("Along the river".to_owned()),
        }
    }

    fn path() -> Vec<Coordinate> {
        vec![
            Coordinate::new(-74.0, 40.0),
            Coordinate::new(-74.005, 40.004),
            Coordinate::new(-74.01, 40.01),
        ]
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("Morning Run", "gpx"), "morning_run.gpx");
        assert_eq!(export_file_name("5K @ Park!", "gpx"), "5k___park_.gpx");
        assert_eq!(export_file_name("Läufchen", "gpx"), "l_ufchen.gpx");
        assert_eq!(export_file_name("", "gpx"), ".gpx");
    }

    #[test]
    fn test_track_points_follow_path() {
        let path = path();
        let elevations = ElevationProfile::new(vec![3.0, 8.0, 5.0]);
        let document = build_track(&path, &elevations, &PaceConfig::default(), &metadata());

        assert_eq!(document.points().len(), path.len());
        assert_eq!(document.track.activity_type, "running");
        assert_eq!(document.track.name, "Morning Run");
        assert_eq!(document.metadata.description.as_deref(), Some("Along the river"));
        assert_eq!(document.metadata.time, metadata().start_instant());
        assert_eq!(document.points()[0].time, metadata().start_instant());

        for (point, coordinate) in document.points().iter().zip(&path) {
            assert_eq!(point.latitude, coordinate.latitude);
            assert_eq!(point.longitude, coordinate.longitude);
        }
        let elevations: Vec<f64> = document.points().iter().map(|p| p.elevation_m).collect();
        assert_eq!(elevations, vec![3.0, 8.0, 5.0]);
        assert!(document.points().windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_stale_elevations_are_ignored() {
        let path = path();
        let stale = ElevationProfile::new(vec![3.0, 8.0]);
        let document = build_track(&path, &stale, &PaceConfig::default(), &metadata());
        assert!(document.points().iter().all(|p| p.elevation_m == 0.0));
    }

    #[test]
    fn test_constant_pace_total_duration() {
        let path = vec![Coordinate::new(-74.0, 40.0), Coordinate::new(-74.01, 40.01)];
        let pace = PaceConfig::new(5.5, 0.0);
        let document = build_track(&path, &ElevationProfile::empty(), &pace, &metadata());

        let elapsed = document.points()[1].time - document.points()[0].time;
        let expected = path_length(&path) / 1000.0 * 5.5 * 60.0;
        assert_relative_eq!(elapsed.num_milliseconds() as f64 / 1000.0, expected, epsilon = 0.001);
    }

    #[test]
    fn test_export_track_uses_serializer() {
        let export = export_track(
            &GpxWriter::default(),
            &path(),
            &ElevationProfile::empty(),
            &PaceConfig::default(),
            &metadata(),
        )
        .unwrap();

        assert_eq!(export.file_name, "morning_run.gpx");
        assert_eq!(export.content_type, "application/gpx+xml");
        let xml = String::from_utf8(export.payload).unwrap();
        assert_eq!(xml.matches("<trkpt ").count(), 3);
    }
}
