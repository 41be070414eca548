// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router assembly.
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, options, post},
    Router,
};

use crate::auth::handlers;
use crate::middleware;
use crate::rules;
use crate::store::UserStore;
use crate::AppState;

/// Create the HTTP router.
///
/// Every `/auth` path also answers `OPTIONS` with `{ok: true}`; the CORS
/// middleware decorates that response with the usual preflight headers.
pub fn create_router<S: UserStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(handlers::login).options(handlers::preflight),
        )
        .route(
            "/auth/logout",
            post(handlers::logout).options(handlers::preflight),
        )
        .route(
            "/auth/register",
            post(handlers::register).options(handlers::preflight),
        )
        .route(
            "/auth/refresh",
            post(handlers::refresh).options(handlers::preflight),
        )
        .route("/auth/{*rest}", options(handlers::preflight))
        .route("/internal/project/{db_name}/rules", get(rules::serve_rules))
        .layer(axum_middleware::from_fn(middleware::no_cache))
        .layer(axum_middleware::from_fn(middleware::cors))
        .with_state(state)
}
