use std::io::Write;

use chrono::{DateTime, Utc};
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Metadata, Waypoint};
use model::track::TrackDocument;
use time::OffsetDateTime;

use crate::export::ExportError;

/// Turns a finished track into a downloadable file payload.
pub trait TrackSerializer: Send + Sync {
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn serialize(&self, document: &TrackDocument) -> Result<Vec<u8>, ExportError>;
}

/// Writes GPX 1.1 documents.
#[derive(Debug, Clone)]
pub struct GpxWriter {
    creator: String,
}

impl GpxWriter {
    pub fn new(creator: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
        }
    }

    pub fn write<W: Write>(&self, document: &TrackDocument, out: W) -> Result<(), ExportError> {
        let gpx = self.to_gpx(document)?;
        gpx::write(&gpx, out).map_err(|why| ExportError::Gpx(why.to_string()))
    }

    fn to_gpx(&self, document: &TrackDocument) -> Result<Gpx, ExportError> {
        let mut segment = gpx::TrackSegment::new();
        for point in document.points() {
            let mut waypoint = Waypoint::new(Point::new(point.longitude, point.latitude));
            waypoint.elevation = Some(point.elevation_m);
            waypoint.time = Some(gpx_time(&point.time)?);
            segment.points.push(waypoint);
        }

        let mut track = gpx::Track::new();
        track.name = Some(xml_text(&document.track.name));
        track.type_ = Some(xml_text(&document.track.activity_type));
        track.segments.push(segment);

        let metadata = &document.metadata;
        Ok(Gpx {
            version: GpxVersion::Gpx11,
            creator: Some(xml_text(&self.creator)),
            metadata: Some(Metadata {
                name: Some(xml_text(&metadata.name)),
                description: metadata.description.as_deref().map(xml_text),
                time: Some(gpx_time(&metadata.time)?),
                ..Default::default()
            }),
            tracks: vec![track],
            ..Default::default()
        })
    }
}

impl Default for GpxWriter {
    fn default() -> Self {
        Self::new("synthetic-run-planner")
    }
}

impl TrackSerializer for GpxWriter {
    fn content_type(&self) -> &'static str {
        "application/gpx+xml"
    }

    fn extension(&self) -> &'static str {
        "gpx"
    }

    fn serialize(&self, document: &TrackDocument) -> Result<Vec<u8>, ExportError> {
        let mut payload = Vec::new();
        self.write(document, &mut payload)?;
        Ok(payload)
    }
}

fn gpx_time(time: &DateTime<Utc>) -> Result<gpx::Time, ExportError> {
    OffsetDateTime::from_unix_timestamp(time.timestamp())
        .and_then(|seconds| seconds.replace_nanosecond(time.timestamp_subsec_nanos()))
        .map(gpx::Time::from)
        .map_err(|why| ExportError::Gpx(format!("{} is out of range: {}", time, why)))
}

/// Drops control characters XML 1.0 can not carry, even escaped.
fn xml_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use model::track::{Track, TrackMetadata, TrackPoint, TrackSegment, RUNNING_ACTIVITY};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Gpx {
        metadata: Metadata,
        trk: Trk,
    }

    #[derive(Debug, Deserialize)]
    struct Metadata {
        name: String,
        desc: Option<String>,
        time: String,
    }

    #[derive(Debug, Deserialize)]
    struct Trk {
        name: String,
        #[serde(rename = "type")]
        kind: Option<String>,
        trkseg: Trkseg,
    }

    #[derive(Debug, Deserialize)]
    struct Trkseg {
        #[serde(rename = "trkpt", default)]
        points: Vec<Trkpt>,
    }

    #[derive(Debug, Deserialize)]
    struct Trkpt {
        lat: f64,
        lon: f64,
        ele: f64,
        time: String,
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 12, 7, 0, 0).unwrap()
    }

    fn instant(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
    }

    fn document(name: &str, description: Option<&str>) -> TrackDocument {
        let start = start();
        TrackDocument {
            metadata: TrackMetadata {
                name: name.to_owned(),
                description: description.map(str::to_owned),
                time: start,
            },
            track: Track {
                name: name.to_owned(),
                activity_type: RUNNING_ACTIVITY.to_owned(),
                segment: TrackSegment {
                    points: vec![
                        TrackPoint {
                            latitude: 40.6941,
                            longitude: -74.0242,
                            elevation_m: 12.0,
                            time: start,
                        },
                        TrackPoint {
                            latitude: 40.6952,
                            longitude: -74.0231,
                            elevation_m: 14.5,
                            time: start + Duration::milliseconds(61_250),
                        },
                    ],
                },
            },
        }
    }

    fn render(document: &TrackDocument) -> String {
        String::from_utf8(GpxWriter::default().serialize(document).unwrap()).unwrap()
    }

    #[test]
    fn test_gpx_reads_back() {
        let xml = render(&document("Morning Run", Some("Easy pace")));
        assert!(xml.contains(r#"version="1.1""#));
        assert!(xml.contains(r#"creator="synthetic-run-planner""#));

        let gpx: Gpx = serde_xml_rs::from_str(&xml).unwrap();
        assert_eq!(gpx.metadata.name, "Morning Run");
        assert_eq!(gpx.metadata.desc.as_deref(), Some("Easy pace"));
        assert_eq!(instant(&gpx.metadata.time), start());
        assert_eq!(gpx.trk.name, "Morning Run");
        assert_eq!(gpx.trk.kind.as_deref(), Some("running"));

        let points = &gpx.trk.trkseg.points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].lat, 40.6941);
        assert_eq!(points[0].lon, -74.0242);
        assert_eq!(points[0].ele, 12.0);
        assert_eq!(points[1].ele, 14.5);
        assert_eq!(instant(&points[0].time), start());
        assert_eq!(
            instant(&points[1].time),
            start() + Duration::milliseconds(61_250)
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(&document("Tom & Jerry's <Run>", None));
        assert!(xml.contains("Tom &amp; Jerry"));
        assert!(!xml.contains("<Run>"));
        assert!(!xml.contains("<desc>"));

        let gpx: Gpx = serde_xml_rs::from_str(&xml).unwrap();
        assert_eq!(gpx.metadata.name, "Tom & Jerry's <Run>");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let xml = render(&document("Night\u{1}Run\u{1b}", Some("dark\u{0}")));
        assert!(!xml.contains('\u{0}'));
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains('\u{1b}'));

        let gpx: Gpx = serde_xml_rs::from_str(&xml).unwrap();
        assert_eq!(gpx.metadata.name, "NightRun");
        assert_eq!(gpx.metadata.desc.as_deref(), Some("dark"));
        assert_eq!(gpx.trk.name, "NightRun");
    }

    #[test]
    fn test_empty_track_has_empty_segment() {
        let mut empty = document("Nothing", None);
        empty.track.segment.points.clear();
        let xml = render(&empty);
        assert!(xml.contains("<trkseg"));
        assert!(!xml.contains("<trkpt"));
    }
}
