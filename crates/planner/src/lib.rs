//! The road-alignment orchestrator: one actor owning the drawn route, its
//! markers and elevations, and every in-flight request against the routing
//! and terrain services.

use std::{
    error, fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use actors::{actor::Actor, actor_ref::ActorRef, mailbox::Mailbox};
use routing::{RoutingService, TerrainService};
use synthesis::{ExportError, TrackSerializer};

pub mod client;
pub mod config;
pub mod markers;
pub mod messages;
pub mod overlay;
pub mod planner;

pub use client::PlannerRef;
pub use config::PlannerConfig;
pub use overlay::{MapOverlay, OverlayCommand, OverlayState};
pub use planner::{AlignmentOutcome, AlignmentTicket, PlannerSettings, PlannerSnapshot, RoutePlanner};

#[derive(Debug, Clone)]
pub enum PlannerError {
    /// The path has more waypoints than one routing request may carry.
    TooManyPoints { count: usize, cap: usize },
    Export(ExportError),
    Unavailable(String),
}

impl error::Error for PlannerError {}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlannerError::TooManyPoints { count, cap } => write!(
                f,
                "Too many points selected: {} (at most {} can be aligned to the road)",
                count, cap
            ),
            PlannerError::Export(e) => write!(f, "Export failed: {}", e),
            PlannerError::Unavailable(e) => write!(f, "Planner unavailable: {}", e),
        }
    }
}

impl From<ExportError> for PlannerError {
    fn from(e: ExportError) -> Self {
        PlannerError::Export(e)
    }
}

impl<A, M> From<actors::actor::ActorError<A, M>> for PlannerError
where
    A: Actor,
    M: Mailbox<A>,
{
    fn from(e: actors::actor::ActorError<A, M>) -> Self {
        PlannerError::Unavailable(e.to_string())
    }
}

/// Everything the planner talks to.
#[derive(Clone)]
pub struct PlannerServices {
    pub routing: Arc<dyn RoutingService>,
    pub terrain: Arc<dyn TerrainService>,
    pub overlay: Arc<dyn MapOverlay>,
    pub serializer: Arc<dyn TrackSerializer>,
}

/// Starts a supervised planner session.
///
/// Every restart gets a fresh incarnation number, so replies to requests of a
/// crashed instance are never applied to its replacement.
pub fn start(config: PlannerConfig, services: PlannerServices) -> ActorRef<RoutePlanner> {
    let incarnations = AtomicU64::new(0);
    actors::run(move || {
        let incarnation = incarnations.fetch_add(1, Ordering::Relaxed);
        RoutePlanner::new(config.clone(), services.clone()).with_incarnation(incarnation)
    })
}
