//! Authentication extractors and session helpers.
//!
//! Actions share one endpoint, so login and admin checks are plain functions
//! over the [`Session`] rather than per-route extractors. Pages use
//! [`OptionalUser`] to show the logged-in customer.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{AdminSession, CurrentUser, session_keys};

/// Extractor that optionally gets the current customer.
///
/// Never rejects: a missing session or an unreadable value reads as a guest.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalUser(user): OptionalUser,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// The logged-in customer, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn current_user(session: &Session) -> Result<Option<CurrentUser>, AppError> {
    Ok(session.get(session_keys::CURRENT_USER).await?)
}

/// The logged-in customer.
///
/// # Errors
///
/// Returns `AppError::LoginRequired` if nobody is logged in.
pub async fn require_user(session: &Session) -> Result<CurrentUser, AppError> {
    current_user(session).await?.ok_or(AppError::LoginRequired)
}

/// The admin login state.
///
/// # Errors
///
/// Returns `AppError::AdminRequired` if the session has no admin login.
pub async fn require_admin(session: &Session) -> Result<AdminSession, AppError> {
    session
        .get::<AdminSession>(session_keys::ADMIN)
        .await?
        .ok_or(AppError::AdminRequired)
}

/// Whether the session has an admin login.
pub async fn is_admin(session: &Session) -> bool {
    matches!(
        session.get::<AdminSession>(session_keys::ADMIN).await,
        Ok(Some(_))
    )
}

/// Helper to set the current customer in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to record an admin login in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN, admin).await
}
