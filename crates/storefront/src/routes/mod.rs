//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /?page={page}[&id=..][&order=..]  - HTML page (see `pages::Page`)
//! POST /                                 - Form action, JSON envelope reply
//! GET  /health                           - Liveness
//! GET  /health/ready                     - Readiness (database ping)
//! ```

pub mod actions;
pub mod pages;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::action_rate_limiter;
use crate::models::{Cart, Preferences, session_keys};
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::render))
        .route("/", post(actions::dispatch).layer(action_rate_limiter()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// The session cart, empty when none has been stored.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// The session display preferences, defaults when none have been stored.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_preferences(
    session: &Session,
) -> Result<Preferences, tower_sessions::session::Error> {
    Ok(session
        .get::<Preferences>(session_keys::PREFERENCES)
        .await?
        .unwrap_or_default())
}
