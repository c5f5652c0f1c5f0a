use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::notification::Notifier;
use persistence::repositories::PgNotifier;
use shared::jwt::JwtVerifier;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, security_headers_middleware, trace_id};
use crate::routes::{health, invitations, join_requests, teams};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub verifier: JwtVerifier,
    pub notifier: Arc<dyn Notifier>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let verifier = JwtVerifier::from_rsa_pem(&config.jwt.public_key, config.jwt.leeway_secs)?;
    let notifier: Arc<dyn Notifier> = Arc::new(PgNotifier::new(pool.clone()));

    let config = Arc::new(config);
    let request_timeout_secs = config.server.request_timeout_secs;

    let state = AppState {
        pool,
        config: config.clone(),
        verifier,
        notifier,
    };

    // The storefront, studio, and admin apps live on several domains; an
    // empty origin list means allow any.
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Team routes (authentication enforced per-handler via the UserAuth
    // extractor, which rejects before any other check)
    let team_routes = Router::new()
        .route("/api/v1/teams/manage", post(teams::manage_team))
        .route("/api/v1/teams/me", get(teams::get_my_team))
        .route("/api/v1/teams/:team_id", get(teams::get_team))
        .route(
            "/api/v1/teams/:team_id/join-requests",
            get(join_requests::list_join_requests),
        )
        .route("/api/v1/invitations", get(invitations::list_invitations));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(team_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
