mod auth;
mod items;

use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;

use crate::auth::middleware::require_auth;
use crate::auth::session::Sessions;
use crate::config::Config;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub sessions: Sessions,
    pub config: Config,
    key: Key,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let key = Key::derive_from(config.session.secret.as_bytes());
        let sessions = Sessions::new(db.clone(), config.session.clone());
        Self {
            db,
            sessions,
            config,
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(auth::home))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(health));

    let protected = Router::new()
        .route("/items", get(items::add_form).post(items::create))
        .route("/list_items", get(items::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .with_state(state)
}
