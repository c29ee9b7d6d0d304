use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::Coordinate;

/// Visual handle for one path coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub coordinate: Coordinate,
}

impl HasId for Marker {
    type IdType = u64;
}
