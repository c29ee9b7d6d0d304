use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// A (longitude, latitude) pair in degrees.
///
/// Serialized as a `[lon, lat]` array, the order GeoJSON and most routing
/// APIs use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

/// Ordered traversal of coordinates. Insertion order is the travel order.
pub type Path = Vec<Coordinate>;

impl Coordinate {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.longitude, coordinate.latitude]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl JsonSchema for Coordinate {
    fn schema_name() -> String {
        "Coordinate".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <[f64; 2]>::json_schema(gen)
    }
}

impl ExampleData for Coordinate {
    fn example_data() -> Self {
        Self::new(-74.0242, 40.6941)
    }
}
