use std::sync::Arc;

use planner::{PlannerConfig, PlannerServices};
use routing::{
    client::{MapboxClient, MapboxCredentials},
    directions::MapboxDirections,
    tilequery::MapboxTerrain,
};
use synthesis::GpxWriter;
use tracing_subscriber::{fmt, EnvFilter};
use web::{config::WebConfig, overlay::InMemoryOverlay, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // request tracing
    let subscriber = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("could not install the tracing subscriber.");

    let web_config = WebConfig::from_env();
    let planner_config = PlannerConfig::default();

    // mapbox
    let credentials =
        MapboxCredentials::env().expect("expected mapbox credentials in env.");
    let client = Arc::new(
        MapboxClient::new(&credentials).expect("could not create the mapbox client."),
    );

    // planner
    let overlay = Arc::new(InMemoryOverlay::new(planner_config.markers_visible));
    let planner = planner::start(
        planner_config,
        PlannerServices {
            routing: Arc::new(MapboxDirections::new(client.clone())),
            terrain: Arc::new(MapboxTerrain::new(client)),
            overlay: overlay.clone(),
            serializer: Arc::new(GpxWriter::default()),
        },
    );

    // web server
    let web_future = start_web_server(&web_config, WebState { planner, overlay });

    if let Err(why) = web_future.await {
        log::error!("Web server stopped: {}", why);
    }
}
