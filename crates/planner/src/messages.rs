use actors::handler::Message;
use model::{
    draw_mode::DrawMode, elevation::ElevationProfile, geometry::ShapeKind, run::RunMetadata,
    Coordinate, Path,
};
use routing::ApiError;
use synthesis::{ProfileRow, TrackExport};

use crate::{
    planner::{AlignmentTicket, PlannerSettings, PlannerSnapshot},
    PlannerError,
};

/// `Ok(None)` when there was nothing to align.
pub type AlignmentStart = Result<Option<AlignmentTicket>, PlannerError>;

pub struct AddPoint {
    pub coordinate: Coordinate,
}

impl Message for AddPoint {
    type Response = PlannerSnapshot;
}

pub struct MapClick {
    pub coordinate: Coordinate,
    pub zoom: f64,
}

impl Message for MapClick {
    type Response = AlignmentStart;
}

pub struct PlaceShape {
    pub kind: ShapeKind,
    pub center: Coordinate,
    pub zoom: f64,
}

impl Message for PlaceShape {
    type Response = AlignmentStart;
}

pub struct AlignToRoad;

impl Message for AlignToRoad {
    type Response = AlignmentStart;
}

pub struct Clear;

impl Message for Clear {
    type Response = PlannerSnapshot;
}

pub struct SetDrawMode(pub DrawMode);

impl Message for SetDrawMode {
    type Response = PlannerSettings;
}

pub struct SetMarkersVisible(pub bool);

impl Message for SetMarkersVisible {
    type Response = PlannerSettings;
}

pub struct SetPace(pub f64);

impl Message for SetPace {
    type Response = PlannerSettings;
}

pub struct SetPaceVariability(pub f64);

impl Message for SetPaceVariability {
    type Response = PlannerSettings;
}

pub struct FlyTo(pub Coordinate);

impl Message for FlyTo {
    type Response = ();
}

pub struct Snapshot;

impl Message for Snapshot {
    type Response = PlannerSnapshot;
}

pub struct Settings;

impl Message for Settings {
    type Response = PlannerSettings;
}

pub struct Profile;

impl Message for Profile {
    type Response = Vec<ProfileRow>;
}

pub struct Export {
    pub metadata: RunMetadata,
}

impl Message for Export {
    type Response = Result<TrackExport, PlannerError>;
}

/// Result of a routing request, reported back by the planner's own task.
pub struct AlignmentResolved {
    pub incarnation: u64,
    pub sequence: u64,
    pub result: Result<(Path, ElevationProfile), ApiError>,
}

impl Message for AlignmentResolved {
    type Response = ();
}

/// Fresh elevations for the path as it was at `revision`.
pub struct ElevationResolved {
    pub incarnation: u64,
    pub revision: u64,
    pub profile: ElevationProfile,
}

impl Message for ElevationResolved {
    type Response = ();
}
