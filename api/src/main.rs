//! mycv API Server
//!
//! User accounts backend: signup/signin with cookie sessions and user management.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ensure_schema, SqlUserRepository};
use app::{AuthService, UsersService};
use auth::SessionKey;
use config::Config;
use domain::ports::UserRepository;

/// Application state shared across all handlers
pub struct AppState<UR: UserRepository> {
    pub users_service: Arc<UsersService<UR>>,
    pub auth_service: Arc<AuthService<UR>>,
    pub session_key: SessionKey,
}

impl<UR: UserRepository> AppState<UR> {
    pub fn new(users: Arc<UR>, session_key: SessionKey) -> Self {
        let users_service = Arc::new(UsersService::new(users));
        let auth_service = Arc::new(AuthService::new(users_service.clone()));

        Self {
            users_service,
            auth_service,
            session_key,
        }
    }
}

impl<UR: UserRepository> Clone for AppState<UR> {
    fn clone(&self) -> Self {
        Self {
            users_service: self.users_service.clone(),
            auth_service: self.auth_service.clone(),
            session_key: self.session_key.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router
///
/// Layers run outermost first: trace, CORS, session, current user.
pub fn build_router<UR: UserRepository>(state: AppState<UR>) -> Router {
    // Routes that need a signed-in user
    let protected = Router::new()
        .route("/auth/whoami", get(handlers::whoami))
        .route_layer(middleware::from_fn(auth::auth_guard));

    Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(handlers::signup::<UR>))
        .route("/auth/signin", post(handlers::signin::<UR>))
        .route("/auth/signout", post(handlers::signout))
        .route("/auth", get(handlers::find_all_users::<UR>))
        .route(
            "/auth/:id",
            get(handlers::find_user::<UR>)
                .patch(handlers::update_user::<UR>)
                .delete(handlers::remove_user::<UR>),
        )
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::current_user_middleware::<UR>,
        ))
        .layer(middleware::from_fn_with_state(
            state.session_key.clone(),
            auth::session_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mycv_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(env = %config.app_env, "Starting mycv API...");

    if config.uses_dev_cookie_key() {
        tracing::warn!("COOKIE_KEY not set, using the development key");
    }

    // Connect to the database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    ensure_schema(&db).await?;
    tracing::info!("Database connected");

    let user_repo = Arc::new(SqlUserRepository::new(db));
    let state = AppState::new(user_repo, SessionKey::new(&config.cookie_key));

    // Rate limiting per client IP
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );

    let app = build_router(state).layer(GovernorLayer {
        config: governor_config,
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
