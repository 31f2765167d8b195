//! Identity endpoints: current user and the SPA code exchange.

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ApiError, AppError};
use crate::server::AppState;
use crate::services::current_user::{self, CurrentUser, Principal};
use crate::services::oauth::AuthTokenResponse;

/// Authorization code obtained by a client that ran the consent step itself
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExchangeRequest {
    pub code: String,
}

/// Name and email of the signed-in user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "No live session", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn me(principal: Principal) -> Result<Json<CurrentUser>, AppError> {
    Ok(Json(current_user::resolve(&principal)?))
}

/// Exchange an authorization code for Google tokens
#[utoipa::path(
    post,
    path = "/oauth2/exchange",
    request_body = ExchangeRequest,
    responses(
        (status = 200, description = "Token payload from Google", body = AuthTokenResponse),
        (status = 400, description = "Google rejected the code; message is its response body", body = ApiError),
        (status = 500, description = "Google OAuth is not configured", body = ApiError),
        (status = 502, description = "Google token endpoint unreachable", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn exchange(
    State(state): State<AppState>,
    payload: Result<Json<ExchangeRequest>, JsonRejection>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let Json(request) = payload?;
    let tokens = state.oauth.exchange_code_for_tokens(&request.code).await?;
    Ok(Json(tokens))
}
