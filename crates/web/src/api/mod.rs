use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use planner::PlannerRef;
use serde_json::json;

pub mod v1;

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .nest_service("/v1", v1::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

/// Reports whether the planner session still answers.
async fn health(State(WebState { planner, .. }): State<WebState>) -> RouteResult<StatusCode> {
    planner
        .settings()
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(RouteErrorResponse::from)
}
