use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, haversine_distance};

use crate::Coordinate;

/// Number of segments in a generated shape. Shapes are closed, so they carry
/// one more point than segments, which keeps them below the routing waypoint
/// cap whatever their size.
pub const SHAPE_SEGMENTS: usize = 20;
pub const SHAPE_POINTS: usize = SHAPE_SEGMENTS + 1;

pub const DEFAULT_CIRCLE_RADIUS_KM: f64 = 1.0;
pub const DEFAULT_HEART_SIZE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Circle,
    Heart,
}

impl ShapeKind {
    /// Generates the shape around `center` using its default size.
    pub fn generate(&self, center: Coordinate, zoom: f64) -> Vec<Coordinate> {
        match self {
            ShapeKind::Circle => circle_shape(center, zoom, DEFAULT_CIRCLE_RADIUS_KM),
            ShapeKind::Heart => heart_shape(center, zoom, DEFAULT_HEART_SIZE),
        }
    }
}

/// Haversine distance between two coordinates in meters.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Sum of the segment distances of `path`, accumulated left to right.
pub fn path_length(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .fold(0.0, |total, pair| total + distance(&pair[0], &pair[1]))
}

/// Parameter value of step `i` when walking once around a closed curve.
fn turn(i: usize) -> f64 {
    i as f64 / SHAPE_SEGMENTS as f64 * 2.0 * PI
}

/// Closed ring around `center` with a radius of `base_radius_km` at the
/// reference zoom, shrinking as `zoom` increases.
pub fn circle_shape(center: Coordinate, zoom: f64, base_radius_km: f64) -> Vec<Coordinate> {
    let radius_km = base_radius_km * geo::zoom_factor(zoom);

    let radius_lon = geo::km_to_longitude_degrees(radius_km, center.latitude);
    let radius_lat = geo::km_to_latitude_degrees(radius_km);

    (0..SHAPE_POINTS)
        .map(|i| {
            let angle = turn(i);
            Coordinate::new(
                center.longitude + radius_lon * angle.cos(),
                center.latitude + radius_lat * angle.sin(),
            )
        })
        .collect()
}

/// Parametric heart curve around `center`; `base_size` is in degrees at the
/// reference zoom.
pub fn heart_shape(center: Coordinate, zoom: f64, base_size: f64) -> Vec<Coordinate> {
    let size = base_size * geo::zoom_factor(zoom);

    (0..SHAPE_POINTS)
        .map(|i| {
            let t = turn(i);
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos();
            Coordinate::new(
                center.longitude + x * size / 16.0,
                center.latitude + y * size / 16.0,
            )
        })
        .collect()
}
