use actors::actor_ref::ActorRef;
use async_trait::async_trait;
use model::{draw_mode::DrawMode, geometry::ShapeKind, run::RunMetadata, Coordinate};
use synthesis::{ProfileRow, TrackExport};

use crate::{
    messages::{
        AddPoint, AlignToRoad, AlignmentStart, Clear, Export, FlyTo, MapClick, PlaceShape,
        Profile, SetDrawMode, SetMarkersVisible, SetPace, SetPaceVariability, Settings, Snapshot,
    },
    planner::{PlannerSettings, PlannerSnapshot, RoutePlanner},
    PlannerError,
};

/// Typed access to a running planner.
#[async_trait]
pub trait PlannerRef {
    async fn add_point(&self, coordinate: Coordinate) -> Result<PlannerSnapshot, PlannerError>;

    /// Adds a point in manual mode, places a shape otherwise.
    async fn map_click(&self, coordinate: Coordinate, zoom: f64) -> AlignmentStart;

    async fn place_shape(&self, kind: ShapeKind, center: Coordinate, zoom: f64) -> AlignmentStart;

    async fn align_to_road(&self) -> AlignmentStart;

    async fn clear(&self) -> Result<PlannerSnapshot, PlannerError>;

    async fn set_draw_mode(&self, mode: DrawMode) -> Result<PlannerSettings, PlannerError>;

    async fn set_markers_visible(&self, visible: bool) -> Result<PlannerSettings, PlannerError>;

    async fn set_pace(&self, pace_min_per_km: f64) -> Result<PlannerSettings, PlannerError>;

    async fn set_pace_variability(&self, percent: f64) -> Result<PlannerSettings, PlannerError>;

    async fn fly_to(&self, center: Coordinate) -> Result<(), PlannerError>;

    async fn snapshot(&self) -> Result<PlannerSnapshot, PlannerError>;

    async fn settings(&self) -> Result<PlannerSettings, PlannerError>;

    async fn profile(&self) -> Result<Vec<ProfileRow>, PlannerError>;

    async fn export(&self, metadata: RunMetadata) -> Result<TrackExport, PlannerError>;
}

#[async_trait]
impl PlannerRef for ActorRef<RoutePlanner> {
    async fn add_point(&self, coordinate: Coordinate) -> Result<PlannerSnapshot, PlannerError> {
        Ok(self.ask(AddPoint { coordinate }).await?)
    }

    async fn map_click(&self, coordinate: Coordinate, zoom: f64) -> AlignmentStart {
        self.ask(MapClick { coordinate, zoom }).await?
    }

    async fn place_shape(&self, kind: ShapeKind, center: Coordinate, zoom: f64) -> AlignmentStart {
        self.ask(PlaceShape { kind, center, zoom }).await?
    }

    async fn align_to_road(&self) -> AlignmentStart {
        self.ask(AlignToRoad).await?
    }

    async fn clear(&self) -> Result<PlannerSnapshot, PlannerError> {
        Ok(self.ask(Clear).await?)
    }

    async fn set_draw_mode(&self, mode: DrawMode) -> Result<PlannerSettings, PlannerError> {
        Ok(self.ask(SetDrawMode(mode)).await?)
    }

    async fn set_markers_visible(&self, visible: bool) -> Result<PlannerSettings, PlannerError> {
        Ok(self.ask(SetMarkersVisible(visible)).await?)
    }

    async fn set_pace(&self, pace_min_per_km: f64) -> Result<PlannerSettings, PlannerError> {
        Ok(self.ask(SetPace(pace_min_per_km)).await?)
    }

    async fn set_pace_variability(&self, percent: f64) -> Result<PlannerSettings, PlannerError> {
        Ok(self.ask(SetPaceVariability(percent)).await?)
    }

    async fn fly_to(&self, center: Coordinate) -> Result<(), PlannerError> {
        Ok(self.tell(FlyTo(center)).await?)
    }

    async fn snapshot(&self) -> Result<PlannerSnapshot, PlannerError> {
        Ok(self.ask(Snapshot).await?)
    }

    async fn settings(&self) -> Result<PlannerSettings, PlannerError> {
        Ok(self.ask(Settings).await?)
    }

    async fn profile(&self) -> Result<Vec<ProfileRow>, PlannerError> {
        Ok(self.ask(Profile).await?)
    }

    async fn export(&self, metadata: RunMetadata) -> Result<TrackExport, PlannerError> {
        self.ask(Export { metadata }).await?
    }
}
