// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core library for the gatehouse session/auth server.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod rules;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::config::Settings;
use crate::store::UserStore;

/// Application state shared across all handlers.
///
/// Built once in `main` and passed into every request by the router; the
/// store handle and signing key are never re-derived after startup.
pub struct AppState<S> {
    /// Per-project user collections
    pub store: Arc<S>,
    /// Session token signing and verification
    pub tokens: TokenService,
    /// Server settings
    pub settings: Arc<Settings>,
    /// Tenant rules document served to the sync engine
    pub rules: Arc<serde_json::Value>,
}

impl<S: UserStore> AppState<S> {
    /// Create the application state. Fails when the token signing
    /// configuration is unusable; the server must not come up half-configured.
    pub fn new(store: S, settings: Settings, rules: serde_json::Value) -> anyhow::Result<Self> {
        let tokens = TokenService::from_settings(&settings.token)?;
        Ok(Self {
            store: Arc::new(store),
            tokens,
            settings: Arc::new(settings),
            rules: Arc::new(rules),
        })
    }
}
