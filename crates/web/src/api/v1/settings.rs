use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use model::draw_mode::DrawMode;
use planner::{PlannerError, PlannerRef, PlannerSettings};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::{
    common::{route_not_found, schema_no_example, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_settings).patch(patch_settings))
        .route("/schema", get(schema_no_example::<PlannerSettings>))
        .route("/patch/schema", get(schema_no_example::<SettingsPatch>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Settings to change; absent fields stay as they are.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SettingsPatch {
    draw_mode: Option<DrawMode>,
    markers_visible: Option<bool>,
    pace_min_per_km: Option<f64>,
    variability_percent: Option<f64>,
}

async fn get_settings(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
) -> RouteResult<Json<PlannerSettings>> {
    planner.settings().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn patch_settings(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Json(patch): Json<SettingsPatch>,
) -> RouteResult<Json<PlannerSettings>> {
    apply_patch(&planner, patch).await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::PATCH)
            .with_uri(original_uri.path())
    })
}

async fn apply_patch<P: PlannerRef + Sync>(
    planner: &P,
    patch: SettingsPatch,
) -> Result<PlannerSettings, PlannerError> {
    if let Some(mode) = patch.draw_mode {
        planner.set_draw_mode(mode).await?;
    }
    if let Some(visible) = patch.markers_visible {
        planner.set_markers_visible(visible).await?;
    }
    if let Some(pace) = patch.pace_min_per_km {
        planner.set_pace(pace).await?;
    }
    if let Some(percent) = patch.variability_percent {
        planner.set_pace_variability(percent).await?;
    }
    planner.settings().await
}
