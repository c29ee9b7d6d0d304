use std::any::Any;

use actors::{
    actor::{Actor, SupervisionStrategy},
    actor_ref::WeakActorRef,
    handler::Handler,
};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use model::{
    draw_mode::DrawMode, elevation::ElevationProfile, geometry::ShapeKind, marker::Marker,
    pace::PaceConfig, summary::RouteSummary, Coordinate, Path,
};
use routing::ApiError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use synthesis::{annotate, export_track, profile_series, summarize, ProfileRow, TrackExport};
use tokio::sync::oneshot;
use utility::id::Id;

use crate::{
    config::PlannerConfig,
    markers::MarkerRegistry,
    messages::{
        AddPoint, AlignToRoad, AlignmentResolved, AlignmentStart, Clear, ElevationResolved,
        Export, FlyTo, MapClick, PlaceShape, Profile, SetDrawMode, SetMarkersVisible, SetPace,
        SetPaceVariability, Settings, Snapshot,
    },
    overlay::OverlayCommand,
    PlannerError, PlannerServices,
};

/// How an alignment request ended.
#[derive(Debug)]
pub enum AlignmentOutcome {
    /// The road-following route replaced the path.
    Applied(PlannerSnapshot),
    /// The routing service failed; nothing changed.
    Failed(ApiError),
    /// A newer request or a path change made the result irrelevant.
    Superseded,
}

/// Handle to a pending alignment request.
#[derive(Debug)]
pub struct AlignmentTicket {
    sequence: u64,
    outcome: oneshot::Receiver<AlignmentOutcome>,
}

impl AlignmentTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Waits for the request to end. A request dropped by a stopped planner
    /// counts as superseded.
    pub async fn outcome(self) -> AlignmentOutcome {
        self.outcome.await.unwrap_or(AlignmentOutcome::Superseded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    pub draw_mode: DrawMode,
    pub markers_visible: bool,
    pub pace: PaceConfig,
}

/// Copy of the planner state handed out to readers.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSnapshot {
    pub path: Path,
    /// Elevations of `path`; empty until they have been looked up.
    pub elevations: Vec<f64>,
    pub markers: Vec<Id<Marker>>,
    pub settings: PlannerSettings,
    pub aligning: bool,
    pub revision: u64,
    pub summary: RouteSummary,
    pub last_error: Option<String>,
}

struct PendingAlignment {
    sequence: u64,
    revision: u64,
    respond_to: oneshot::Sender<AlignmentOutcome>,
}

/// Owner of the drawn route.
///
/// The path, its elevations and its markers only ever change inside a
/// handler, so every reader sees them consistent. Network calls run on
/// spawned tasks that report back through messages; a report is applied
/// only if it still belongs to the latest request and the path has not
/// changed since it was issued.
pub struct RoutePlanner {
    config: PlannerConfig,
    services: PlannerServices,
    myself: Option<WeakActorRef<RoutePlanner>>,
    /// Distinguishes this instance from the ones a supervisor restart
    /// replaced. Replies are only accepted from tasks spawned by it.
    incarnation: u64,

    path: Path,
    elevations: ElevationProfile,
    markers: MarkerRegistry,
    draw_mode: DrawMode,
    markers_visible: bool,
    pace: PaceConfig,

    /// Bumped on every change of `path`.
    revision: u64,
    /// Bumped for every alignment request issued.
    sequence: u64,
    pending: Option<PendingAlignment>,
    last_error: Option<String>,
}

impl RoutePlanner {
    pub fn new(config: PlannerConfig, services: PlannerServices) -> Self {
        Self {
            markers_visible: config.markers_visible,
            pace: config.pace,
            config,
            services,
            myself: None,
            incarnation: 0,
            path: Path::new(),
            elevations: ElevationProfile::empty(),
            markers: MarkerRegistry::new(),
            draw_mode: DrawMode::default(),
            revision: 0,
            sequence: 0,
            pending: None,
            last_error: None,
        }
    }

    /// Marks this instance as the `incarnation`-th one of its session.
    pub fn with_incarnation(mut self, incarnation: u64) -> Self {
        self.incarnation = incarnation;
        self
    }

    fn settings(&self) -> PlannerSettings {
        PlannerSettings {
            draw_mode: self.draw_mode,
            markers_visible: self.markers_visible,
            pace: self.pace,
        }
    }

    fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            path: self.path.clone(),
            elevations: self
                .elevations
                .for_path(&self.path)
                .map(|profile| profile.elevations_m.clone())
                .unwrap_or_default(),
            markers: self.markers.ids(),
            settings: self.settings(),
            aligning: self.pending.is_some(),
            revision: self.revision,
            summary: summarize(&self.path, &self.elevations, &self.pace),
            last_error: self.last_error.clone(),
        }
    }

    fn release_markers(&mut self) -> Vec<OverlayCommand> {
        self.markers
            .release_all()
            .into_iter()
            .map(|id| OverlayCommand::RemoveMarker { id })
            .collect()
    }

    fn add_marker(&mut self, at: Coordinate) -> OverlayCommand {
        OverlayCommand::AddMarker {
            id: self.markers.create(at),
            at,
            visible: self.markers_visible,
        }
    }

    fn add_point(&mut self, coordinate: Coordinate) {
        self.supersede_pending();
        self.path.push(coordinate);
        self.revision += 1;

        let mut commands = vec![self.add_marker(coordinate)];
        if self.path.len() >= 2 {
            commands.push(OverlayCommand::DrawLine {
                path: self.path.clone(),
            });
        }
        self.services.overlay.apply(commands);
        self.refresh_elevations();
    }

    /// Replaces the path together with its elevations, markers and line.
    fn replace_path(&mut self, path: Path, elevations: ElevationProfile) {
        self.revision += 1;

        let mut commands = self.release_markers();
        for coordinate in &path {
            commands.push(self.add_marker(*coordinate));
        }
        commands.push(OverlayCommand::DrawLine { path: path.clone() });

        self.path = path;
        self.elevations = elevations;
        self.services.overlay.apply(commands);
    }

    fn clear(&mut self) {
        self.supersede_pending();
        self.revision += 1;
        self.path.clear();
        self.elevations = ElevationProfile::empty();

        let mut commands = self.release_markers();
        commands.push(OverlayCommand::RemoveLine);
        self.services.overlay.apply(commands);
    }

    fn place_shape(&mut self, kind: ShapeKind, center: Coordinate, zoom: f64) -> AlignmentStart {
        self.clear();
        let shape = self.config.shape(kind, center, zoom);
        self.start_alignment(shape)
    }

    fn supersede_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Alignment request {} superseded.", pending.sequence);
            let _ = pending.respond_to.send(AlignmentOutcome::Superseded);
        }
    }

    /// Issues a routing request through `waypoints`, replacing any request
    /// still pending.
    fn start_alignment(&mut self, waypoints: Path) -> AlignmentStart {
        let count = waypoints.len();
        if count < 2 {
            return Ok(None);
        }
        if count > self.config.waypoint_cap {
            return Err(PlannerError::TooManyPoints {
                count,
                cap: self.config.waypoint_cap,
            });
        }
        let myself = self
            .myself
            .clone()
            .ok_or_else(|| PlannerError::Unavailable("planner is not running".to_owned()))?;

        self.supersede_pending();
        self.sequence += 1;
        let sequence = self.sequence;
        let (respond_to, outcome) = oneshot::channel();
        self.pending = Some(PendingAlignment {
            sequence,
            revision: self.revision,
            respond_to,
        });

        debug!("Aligning {count} waypoints to the road (request {sequence}).");
        let routing = self.services.routing.clone();
        let terrain = self.services.terrain.clone();
        let concurrency = self.config.elevation_concurrency;
        let incarnation = self.incarnation;
        tokio::spawn(async move {
            let result = match routing.route(&waypoints).await {
                Ok(path) => {
                    let elevations = annotate(terrain.as_ref(), &path, concurrency).await;
                    Ok((path, elevations))
                }
                Err(why) => Err(why),
            };
            let resolved = AlignmentResolved {
                incarnation,
                sequence,
                result,
            };
            if !myself.tell(resolved).await {
                debug!("Planner stopped before request {sequence} resolved.");
            }
        });

        Ok(Some(AlignmentTicket { sequence, outcome }))
    }

    /// Looks up elevations for the current path in the background.
    fn refresh_elevations(&mut self) {
        if self.path.len() < 2 {
            return;
        }
        let Some(myself) = self.myself.clone() else {
            return;
        };

        let terrain = self.services.terrain.clone();
        let concurrency = self.config.elevation_concurrency;
        let path = self.path.clone();
        let revision = self.revision;
        let incarnation = self.incarnation;
        tokio::spawn(async move {
            let profile = annotate(terrain.as_ref(), &path, concurrency).await;
            myself
                .tell(ElevationResolved {
                    incarnation,
                    revision,
                    profile,
                })
                .await;
        });
    }
}

impl Actor for RoutePlanner {
    fn started(&mut self, myself: WeakActorRef<Self>) {
        self.myself = Some(myself);
    }

    fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        error!("Route planner failed ({:?}), starting over.", error);
        self.clear();
        SupervisionStrategy::Restart
    }
}

#[async_trait]
impl Handler<AddPoint> for RoutePlanner {
    async fn handle(&mut self, message: AddPoint) -> PlannerSnapshot {
        self.add_point(message.coordinate);
        self.snapshot()
    }
}

#[async_trait]
impl Handler<MapClick> for RoutePlanner {
    async fn handle(&mut self, message: MapClick) -> AlignmentStart {
        match self.draw_mode.shape() {
            Some(kind) => self.place_shape(kind, message.coordinate, message.zoom),
            None => {
                self.add_point(message.coordinate);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Handler<PlaceShape> for RoutePlanner {
    async fn handle(&mut self, message: PlaceShape) -> AlignmentStart {
        self.place_shape(message.kind, message.center, message.zoom)
    }
}

#[async_trait]
impl Handler<AlignToRoad> for RoutePlanner {
    async fn handle(&mut self, _: AlignToRoad) -> AlignmentStart {
        self.start_alignment(self.path.clone())
    }
}

#[async_trait]
impl Handler<Clear> for RoutePlanner {
    async fn handle(&mut self, _: Clear) -> PlannerSnapshot {
        self.clear();
        self.snapshot()
    }
}

#[async_trait]
impl Handler<SetDrawMode> for RoutePlanner {
    async fn handle(&mut self, message: SetDrawMode) -> PlannerSettings {
        self.draw_mode = message.0;
        self.settings()
    }
}

#[async_trait]
impl Handler<SetMarkersVisible> for RoutePlanner {
    async fn handle(&mut self, message: SetMarkersVisible) -> PlannerSettings {
        self.markers_visible = message.0;
        self.services
            .overlay
            .apply(vec![OverlayCommand::SetMarkersVisible { visible: message.0 }]);
        self.settings()
    }
}

#[async_trait]
impl Handler<SetPace> for RoutePlanner {
    async fn handle(&mut self, message: SetPace) -> PlannerSettings {
        self.pace = self.pace.with_pace(message.0);
        self.settings()
    }
}

#[async_trait]
impl Handler<SetPaceVariability> for RoutePlanner {
    async fn handle(&mut self, message: SetPaceVariability) -> PlannerSettings {
        self.pace = self.pace.with_variability(message.0);
        self.settings()
    }
}

#[async_trait]
impl Handler<FlyTo> for RoutePlanner {
    async fn handle(&mut self, message: FlyTo) {
        self.services
            .overlay
            .apply(vec![OverlayCommand::FlyTo { center: message.0 }]);
    }
}

#[async_trait]
impl Handler<Snapshot> for RoutePlanner {
    async fn handle(&mut self, _: Snapshot) -> PlannerSnapshot {
        self.snapshot()
    }
}

#[async_trait]
impl Handler<Settings> for RoutePlanner {
    async fn handle(&mut self, _: Settings) -> PlannerSettings {
        self.settings()
    }
}

#[async_trait]
impl Handler<Profile> for RoutePlanner {
    async fn handle(&mut self, _: Profile) -> Vec<ProfileRow> {
        profile_series(&self.path, &self.elevations, &self.pace)
    }
}

#[async_trait]
impl Handler<Export> for RoutePlanner {
    async fn handle(&mut self, message: Export) -> Result<TrackExport, PlannerError> {
        Ok(export_track(
            self.services.serializer.as_ref(),
            &self.path,
            &self.elevations,
            &self.pace,
            &message.metadata,
        )?)
    }
}

#[async_trait]
impl Handler<AlignmentResolved> for RoutePlanner {
    async fn handle(&mut self, message: AlignmentResolved) {
        if message.incarnation != self.incarnation {
            debug!(
                "Dropping response to request {} issued before a restart.",
                message.sequence
            );
            return;
        }
        let pending = match self.pending.take() {
            Some(pending) if pending.sequence == message.sequence => pending,
            other => {
                self.pending = other;
                debug!(
                    "Dropping response to superseded request {}.",
                    message.sequence
                );
                return;
            }
        };
        if pending.revision != self.revision {
            debug!(
                "Path changed while request {} was pending, dropping response.",
                message.sequence
            );
            let _ = pending.respond_to.send(AlignmentOutcome::Superseded);
            return;
        }

        let outcome = match message.result {
            Ok((path, elevations)) => {
                info!(
                    "Aligned route {} to {} road points.",
                    message.sequence,
                    path.len()
                );
                self.replace_path(path, elevations);
                self.last_error = None;
                AlignmentOutcome::Applied(self.snapshot())
            }
            Err(why) => {
                warn!("Road alignment {} failed: {}", message.sequence, why);
                self.last_error = Some(why.to_string());
                AlignmentOutcome::Failed(why)
            }
        };
        if pending.respond_to.send(outcome).is_err() {
            debug!("Nobody is waiting for request {}.", message.sequence);
        }
    }
}

#[async_trait]
impl Handler<ElevationResolved> for RoutePlanner {
    async fn handle(&mut self, message: ElevationResolved) {
        if message.incarnation == self.incarnation && message.revision == self.revision {
            self.elevations = message.profile;
        } else {
            debug!("Dropping elevations of outdated path revision {}.", message.revision);
        }
    }
}
