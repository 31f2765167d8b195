//! # Session Authentication
//!
//! Browser sessions are identified by an opaque random token carried in an
//! HttpOnly cookie. The middleware resolves that token to a stored
//! [`Principal`](crate::services::current_user::Principal) and rejects `/api`
//! requests that lack a live session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::repositories::{SessionError, SessionRepository};
use crate::server::AppState;

pub const SESSION_COOKIE: &str = "ACADEMICERP_SESSION";

/// 32 random bytes, base64url without padding.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Rejects requests without a live session; otherwise inserts the
/// [`Principal`](crate::services::current_user::Principal) into request
/// extensions for handlers to extract. A storage failure is a 500, not a 401.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Err(AppError::Unauthenticated);
    };

    let principal = match SessionRepository::new(state.db.clone())
        .find_principal(&token)
        .await
    {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            tracing::debug!("Session cookie did not match a live session");
            return Err(AppError::Unauthenticated);
        }
        Err(SessionError::Principal(err)) => {
            tracing::warn!(error = %err, "Stored session could not be decoded");
            return Err(AppError::Unauthenticated);
        }
        Err(SessionError::Database(err)) => {
            tracing::error!(error = %err, "Failed to resolve session");
            return Err(AppError::Database(err));
        }
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Session cookie for a freshly created session.
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.session_cookie_secure)
        .max_age(time::Duration::minutes(config.session_ttl_minutes))
        .build()
}

/// Removal cookie; path must match the one the session cookie was set with.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
