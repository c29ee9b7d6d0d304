use model::{marker::Marker, Coordinate, Path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

/// One change to the map overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OverlayCommand {
    DrawLine { path: Path },
    RemoveLine,
    AddMarker {
        id: Id<Marker>,
        at: Coordinate,
        visible: bool,
    },
    RemoveMarker { id: Id<Marker> },
    SetMarkersVisible { visible: bool },
    FlyTo { center: Coordinate },
}

/// The map surface. Receives every change belonging to one state transition
/// as a single batch.
pub trait MapOverlay: Send + Sync {
    fn apply(&self, commands: Vec<OverlayCommand>);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlayMarker {
    pub id: Id<Marker>,
    pub at: Coordinate,
}

/// What a map showing the overlay currently displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    pub line: Option<Path>,
    pub markers: Vec<OverlayMarker>,
    pub markers_visible: bool,
    pub camera: Option<Coordinate>,
    /// Number of batches applied so far.
    pub batches: u64,
}

impl OverlayState {
    pub fn new(markers_visible: bool) -> Self {
        Self {
            markers_visible,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, commands: &[OverlayCommand]) {
        for command in commands {
            match command {
                OverlayCommand::DrawLine { path } => self.line = Some(path.clone()),
                OverlayCommand::RemoveLine => self.line = None,
                OverlayCommand::AddMarker { id, at, .. } => {
                    self.markers.push(OverlayMarker { id: *id, at: *at });
                }
                OverlayCommand::RemoveMarker { id } => {
                    self.markers.retain(|marker| marker.id != *id);
                }
                OverlayCommand::SetMarkersVisible { visible } => self.markers_visible = *visible,
                OverlayCommand::FlyTo { center } => self.camera = Some(*center),
            }
        }
        self.batches += 1;
    }
}
