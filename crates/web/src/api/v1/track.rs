use axum::{
    extract::{OriginalUri, Query, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, on, post},
    Json, Router,
};
use model::{run::RunMetadata, summary::RouteSummary};
use planner::{PlannerError, PlannerRef};
use serde::Deserialize;
use synthesis::{to_csv, ProfileRow};
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/summary/schema", get(schema::<RouteSummary>))
        .route("/profile", get(get_profile))
        .route("/profile/schema", get(schema_no_example::<VecResponse<ProfileRow>>))
        .route("/export", post(export))
        .route("/export/schema", get(schema::<RunMetadata>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ProfileFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileQuery {
    #[serde(default)]
    format: ProfileFormat,
}

async fn get_summary(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
) -> RouteResult<Json<RouteSummary>> {
    planner
        .snapshot()
        .await
        .map(|snapshot| Json(snapshot.summary))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_profile(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Query(query): Query<ProfileQuery>,
) -> RouteResult<Response> {
    let rows = planner.profile().await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;

    match query.format {
        ProfileFormat::Json => Ok(VecResponse::new(rows).json().into_response()),
        ProfileFormat::Csv => to_csv(&rows)
            .map(|csv| ([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
            .map_err(|why| {
                RouteErrorResponse::from(PlannerError::from(why))
                    .with_method(&Method::GET)
                    .with_uri(original_uri.path())
            }),
    }
}

/// Serializes the current path as a downloadable track file.
async fn export(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { planner, .. }): State<WebState>,
    Json(metadata): Json<RunMetadata>,
) -> RouteResult<Response> {
    planner
        .export(metadata)
        .await
        .map(|export| {
            let disposition = format!("attachment; filename=\"{}\"", export.file_name);
            (
                [
                    (header::CONTENT_TYPE, export.content_type.to_owned()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.payload,
            )
                .let_owned(IntoResponse::into_response)
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}
