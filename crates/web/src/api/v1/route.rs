use axum::{
    extract::{OriginalUri, Query, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Json, Router,
};
use log::warn;
use model::{geometry::ShapeKind, Coordinate};
use planner::{AlignmentOutcome, AlignmentTicket, PlannerRef, PlannerSnapshot};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::REFERENCE_ZOOM;

use crate::{
    common::{route_not_found, schema_no_example, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_route).delete(clear_route))
        .route("/schema", get(schema_no_example::<PlannerSnapshot>))
        .route("/points", post(add_point))
        .route("/click", post(map_click))
        .route("/shape", post(place_shape))
        .route("/align", post(align_to_road))
        .route("/align/schema", get(schema_no_example::<AlignmentDto>))
        .route("/fly-to", post(fly_to))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Deepest zoom level of the map tiles.
const MAX_ZOOM: f64 = 22.0;

fn default_zoom() -> f64 {
    REFERENCE_ZOOM
}

fn invalid_body(why: String) -> RouteErrorResponse {
    RouteErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY)
        .with_message("Invalid Request Body")
        .with_detailed_information(why)
}

/// Shapes are sized by `cos(latitude)`, so the poles themselves are out.
fn check_coordinate(at: &Coordinate) -> RouteResult<()> {
    if (-180.0..=180.0).contains(&at.longitude) && at.latitude.abs() < 90.0 {
        Ok(())
    } else {
        Err(invalid_body(format!(
            "[{}, {}] is not a coordinate on the map.",
            at.longitude, at.latitude
        )))
    }
}

fn check_zoom(zoom: f64) -> RouteResult<()> {
    if (0.0..=MAX_ZOOM).contains(&zoom) {
        Ok(())
    } else {
        Err(invalid_body(format!("Zoom {} is outside of 0 to {}.", zoom, MAX_ZOOM)))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointBody {
    at: Coordinate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClickBody {
    at: Coordinate,
    #[serde(default = "default_zoom")]
    zoom: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeBody {
    kind: ShapeKind,
    center: Coordinate,
    #[serde(default = "default_zoom")]
    zoom: f64,
}

#[derive(Deserialize)]
struct FlyToBody {
    center: Coordinate,
}

#[derive(Debug, Default, Deserialize)]
struct AlignQuery {
    /// Hold the response until the routing request has ended.
    #[serde(default)]
    wait: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) enum AlignmentStatus {
    /// The path was too short to align.
    NotIssued,
    Pending,
    Applied,
    Superseded,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AlignmentDto {
    status: AlignmentStatus,
    sequence: Option<u64>,
    snapshot: Option<PlannerSnapshot>,
}

async fn get_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
) -> RouteResult<Json<PlannerSnapshot>> {
    planner.snapshot().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn clear_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
) -> RouteResult<Json<PlannerSnapshot>> {
    planner.clear().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::DELETE)
            .with_uri(original_uri.path())
    })
}

async fn add_point(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Json(body): Json<PointBody>,
) -> RouteResult<Json<PlannerSnapshot>> {
    check_coordinate(&body.at)
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))?;
    planner.add_point(body.at).await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })
}

async fn map_click(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Query(query): Query<AlignQuery>,
    Json(body): Json<ClickBody>,
) -> RouteResult<Json<AlignmentDto>> {
    let started = match check_coordinate(&body.at).and_then(|_| check_zoom(body.zoom)) {
        Ok(()) => planner.map_click(body.at, body.zoom).await,
        Err(why) => return Err(why.with_method(&Method::POST).with_uri(original_uri.path())),
    };
    alignment_response(&planner, started, query.wait)
        .await
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))
}

async fn place_shape(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Query(query): Query<AlignQuery>,
    Json(body): Json<ShapeBody>,
) -> RouteResult<Json<AlignmentDto>> {
    let started = match check_coordinate(&body.center).and_then(|_| check_zoom(body.zoom)) {
        Ok(()) => planner.place_shape(body.kind, body.center, body.zoom).await,
        Err(why) => return Err(why.with_method(&Method::POST).with_uri(original_uri.path())),
    };
    alignment_response(&planner, started, query.wait)
        .await
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))
}

async fn align_to_road(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Query(query): Query<AlignQuery>,
) -> RouteResult<Json<AlignmentDto>> {
    let started = planner.align_to_road().await;
    alignment_response(&planner, started, query.wait)
        .await
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))
}

async fn fly_to(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Json(body): Json<FlyToBody>,
) -> RouteResult<StatusCode> {
    check_coordinate(&body.center)
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))?;
    planner
        .fly_to(body.center)
        .await
        .map(|_| StatusCode::ACCEPTED)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn alignment_response<P: PlannerRef + Sync>(
    planner: &P,
    started: Result<Option<AlignmentTicket>, planner::PlannerError>,
    wait: bool,
) -> RouteResult<Json<AlignmentDto>> {
    let ticket = match started? {
        Some(ticket) => ticket,
        None => {
            return Ok(Json(AlignmentDto {
                status: AlignmentStatus::NotIssued,
                sequence: None,
                snapshot: Some(planner.snapshot().await?),
            }))
        }
    };

    let sequence = Some(ticket.sequence());
    if !wait {
        return Ok(Json(AlignmentDto {
            status: AlignmentStatus::Pending,
            sequence,
            snapshot: None,
        }));
    }

    match ticket.outcome().await {
        AlignmentOutcome::Applied(snapshot) => Ok(Json(AlignmentDto {
            status: AlignmentStatus::Applied,
            sequence,
            snapshot: Some(snapshot),
        })),
        AlignmentOutcome::Superseded => Ok(Json(AlignmentDto {
            status: AlignmentStatus::Superseded,
            sequence,
            snapshot: None,
        })),
        AlignmentOutcome::Failed(why) => {
            warn!("Road alignment {:?} failed: {}", sequence, why);
            Err(RouteErrorResponse::new(StatusCode::BAD_GATEWAY)
                .with_message("Could not align the route to the road.")
                .with_detailed_information(why.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_on_the_map() {
        assert!(check_coordinate(&Coordinate::new(180.0, -89.9)).is_ok());
        assert!(check_coordinate(&Coordinate::new(-74.0, 40.7)).is_ok());

        for at in [
            Coordinate::new(0.0, 90.0),
            Coordinate::new(0.0, -90.0),
            Coordinate::new(180.5, 0.0),
            Coordinate::new(f64::NAN, 0.0),
            Coordinate::new(0.0, f64::INFINITY),
        ] {
            let why = check_coordinate(&at).unwrap_err();
            assert_eq!(why.status_code, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_zoom_range() {
        assert!(check_zoom(0.0).is_ok());
        assert!(check_zoom(REFERENCE_ZOOM).is_ok());
        assert!(check_zoom(MAX_ZOOM).is_ok());
        assert!(check_zoom(-1.0).is_err());
        assert!(check_zoom(1e9).is_err());
        assert!(check_zoom(f64::NAN).is_err());
    }
}
