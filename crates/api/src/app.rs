use axum::{
    middleware,
    routing::{delete, get, post},
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

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_service_key, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    calls, chat, health, teams, widget_config, widget_embed, widgets, wordpress_plugin,
};
use crate::services::{ChatWebhookRelay, RetellClient};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub retell: RetellClient,
    pub chat_relay: ChatWebhookRelay,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting applies to the public proxy endpoints; 0 disables it.
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let retell = RetellClient::new(&config.provider.api_url, config.provider.timeout_secs);

    let state = AppState {
        pool,
        config: config.clone(),
        retell,
        chat_relay: ChatWebhookRelay::new(),
        rate_limiter,
    };

    // The widget endpoints are embedded on arbitrary third-party pages, so
    // they default to any origin; the config list narrows the rest.
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

    // Public widget endpoints (no authentication; these are the surface the
    // embed script and third-party pages talk to)
    let widget_routes = Router::new()
        .route("/widget-config", get(widget_config::get_widget_config))
        .route("/widget-embed", get(widget_embed::get_widget_embed))
        .route("/wordpress-plugin", get(wordpress_plugin::get_wordpress_plugin))
        .route("/retell-create-call", post(calls::create_call))
        .route("/retell-text-chat", post(chat::text_chat));

    // Dashboard CRUD surface (requires the service key)
    let dashboard_routes = Router::new()
        .route(
            "/api/v1/widgets",
            get(widgets::list_widgets).post(widgets::create_widget),
        )
        .route(
            "/api/v1/widgets/:id",
            get(widgets::get_widget)
                .patch(widgets::update_widget)
                .delete(widgets::delete_widget),
        )
        .route("/api/v1/teams", post(teams::create_team))
        .route(
            "/api/v1/teams/:id",
            get(teams::get_team).delete(teams::delete_team),
        )
        .route(
            "/api/v1/teams/:id/members",
            get(teams::list_members).post(teams::add_member),
        )
        .route(
            "/api/v1/teams/:id/members/:user_id",
            delete(teams::remove_member),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_service_key,
        ));

    // Health and metrics (public, no auth)
    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(widget_routes)
        .merge(dashboard_routes)
        .merge(ops_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
