use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::ShapeKind;

/// What a click on the map does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DrawMode {
    /// Append the clicked point to the path.
    #[default]
    Manual,
    /// Replace the path with a road-aligned circle around the click.
    Circle,
    /// Replace the path with a road-aligned heart around the click.
    Heart,
}

impl DrawMode {
    pub fn shape(&self) -> Option<ShapeKind> {
        match self {
            DrawMode::Manual => None,
            DrawMode::Circle => Some(ShapeKind::Circle),
            DrawMode::Heart => Some(ShapeKind::Heart),
        }
    }
}
