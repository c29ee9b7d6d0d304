use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use planner::OverlayState;

use crate::{
    common::{route_not_found, schema_no_example, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_overlay))
        .route("/schema", get(schema_no_example::<OverlayState>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_overlay(State(WebState { overlay, .. }): State<WebState>) -> Json<OverlayState> {
    Json(overlay.state())
}
