pub use crate::common::RouteResult;

use std::sync::Arc;

use actors::actor_ref::ActorRef;
use axum::{extract::FromRef, routing::on, Router};
use log::info;
use planner::RoutePlanner;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    config::WebConfig,
    overlay::InMemoryOverlay,
};

pub mod api;
pub mod common;
pub mod config;
pub mod overlay;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub planner: ActorRef<RoutePlanner>,
    pub overlay: Arc<InMemoryOverlay>,
}

pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, state: WebState) -> std::io::Result<()> {
    axum::serve(listener, app(state).into_make_service()).await
}

pub async fn start_web_server(config: &WebConfig, state: WebState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}.", config.bind_address);
    serve(listener, state).await
}
