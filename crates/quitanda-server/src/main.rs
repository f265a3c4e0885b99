mod auth;
mod config;
mod db;
mod error;
mod models;
mod pages;
mod routes;
mod store;

use config::Config;
use routes::{create_router, AppState};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quitanda_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let port = config.server_port;

    let pool = db::create_pool(&config.sqlite_path);
    tracing::info!("database initialized at {}", config.sqlite_path);

    let state = AppState::new(pool, config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("quitanda-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
