//! Browser login flow: redirect to Google, handle the callback, log out.
//!
//! These routes answer with redirects rather than JSON. Callback failures
//! land on the logout page with an `error` flag so the frontend can show a
//! message.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use url::Url;
use utoipa::IntoParams;

use crate::auth::{self, SESSION_COOKIE};
use crate::error::AppError;
use crate::repositories::{OAuthStateRepository, SessionRepository};
use crate::server::AppState;
use crate::services::current_user::Principal;

pub const PROVIDER: &str = "google";
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Start the Google login redirect
#[utoipa::path(
    get,
    path = "/oauth2/authorization/google",
    responses(
        (status = 303, description = "Redirect to Google consent screen"),
        (status = 500, description = "Google OAuth is not configured")
    ),
    tag = "login"
)]
pub async fn authorize(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let states = OAuthStateRepository::new(state.db.clone());
    if let Err(err) = states.cleanup_expired().await {
        tracing::warn!(error = %err, "Failed to purge expired OAuth states");
    }

    let token = auth::generate_token();
    let url = state.oauth.build_authorize_url(&token)?;
    states.create(PROVIDER, &token, STATE_TTL_MINUTES).await?;

    tracing::info!(provider = PROVIDER, "Starting OAuth login");
    Ok(Redirect::to(url.as_str()))
}

/// Google redirect target; establishes the session
#[utoipa::path(
    get,
    path = "/login/oauth2/code/google",
    params(CallbackParams),
    responses(
        (status = 303, description = "Redirect to the frontend; `?error` appended on failure")
    ),
    tag = "login"
)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    match complete_login(&state, params).await {
        Ok(token) => {
            let jar = jar.add(auth::session_cookie(&state.config, token));
            (jar, Redirect::to(&state.config.login_success_url)).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "OAuth login failed");
            Redirect::to(&error_redirect(&state.config.logout_success_url)).into_response()
        }
    }
}

/// `base` with an `error` flag appended to any existing query.
fn error_redirect(base: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_key_only("error");
            url.to_string()
        }
        Err(_) if base.contains('?') => format!("{base}&error"),
        Err(_) => format!("{base}?error"),
    }
}

async fn complete_login(state: &AppState, params: CallbackParams) -> Result<String, AppError> {
    if let Some(error) = params.error {
        tracing::info!(%error, "Provider returned an authorization error");
        return Err(AppError::Unauthenticated);
    }
    let (Some(code), Some(state_token)) = (params.code, params.state) else {
        return Err(AppError::Unauthenticated);
    };

    OAuthStateRepository::new(state.db.clone())
        .find_and_consume(PROVIDER, &state_token)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let tokens = state.oauth.exchange_code_for_tokens(&code).await?;
    let access_token = tokens.access_token.as_deref().ok_or_else(|| {
        AppError::UpstreamUnavailable("Token response did not include an access token".into())
    })?;
    let user_info = state.oauth.fetch_user_info(access_token).await?;
    let principal = Principal::from_user_info(user_info, tokens.id_token.is_some());

    let sessions = SessionRepository::new(state.db.clone());
    if let Err(err) = sessions.cleanup_expired().await {
        tracing::warn!(error = %err, "Failed to purge expired sessions");
    }

    let token = auth::generate_token();
    sessions
        .create(&token, &principal, state.config.session_ttl_minutes)
        .await
        .map_err(|err| AppError::Unclassified(err.into()))?;

    tracing::info!(provider = PROVIDER, "User signed in");
    Ok(token)
}

/// End the session and return to the login page
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Redirect to the logout success URL")
    ),
    tag = "login"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
        && let Err(err) = SessionRepository::new(state.db.clone())
            .delete(&token)
            .await
    {
        tracing::warn!(error = %err, "Failed to delete session on logout");
    }

    let jar = jar.remove(auth::expired_session_cookie());
    (jar, Redirect::to(&state.config.logout_success_url)).into_response()
}
