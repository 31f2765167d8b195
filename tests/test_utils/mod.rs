//! Test utilities for database and router testing.
//!
//! Sets up in-memory SQLite databases with migrations applied and builds the
//! full application router on top of them.

#![allow(dead_code)]

use std::sync::Arc;

use academicerp::auth::{SESSION_COOKIE, generate_token};
use academicerp::config::{AppConfig, GoogleOAuthConfig};
use academicerp::repositories::SessionRepository;
use academicerp::server::{AppState, create_app};
use academicerp::services::Principal;
use academicerp::services::current_user::OidcIdentity;
use anyhow::Result;
use axum::{Router, body::Body, http::Response};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// Foreign keys stay enforced so cascade behaviour matches Postgres.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Configuration pointing the Google endpoints at `provider_base`.
pub fn test_config(provider_base: &str) -> AppConfig {
    AppConfig {
        google: GoogleOAuthConfig {
            client_id: Some("client-123".into()),
            client_secret: Some("secret-456".into()),
            authorize_url: format!("{provider_base}/auth"),
            token_url: format!("{provider_base}/token"),
            userinfo_url: format!("{provider_base}/userinfo"),
            ..GoogleOAuthConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Full router over `db` with default configuration.
pub fn test_app(db: &DatabaseConnection) -> Result<Router> {
    test_app_with_config(db, AppConfig::default())
}

pub fn test_app_with_config(db: &DatabaseConnection, config: AppConfig) -> Result<Router> {
    let state = AppState::new(config, db.clone())?;
    Ok(create_app(state))
}

/// Stores a live session for a signed-in OIDC user and returns the `Cookie`
/// header value that carries it.
pub async fn login_cookie(db: &DatabaseConnection) -> Result<String> {
    let principal = Principal::Oidc(OidcIdentity {
        subject: "1099".into(),
        full_name: Some("Asha Rao".into()),
        given_name: Some("Asha".into()),
        email: Some("asha@example.edu".into()),
    });
    session_cookie_for(db, &principal, 60).await
}

pub async fn session_cookie_for(
    db: &DatabaseConnection,
    principal: &Principal,
    ttl_minutes: i64,
) -> Result<String> {
    let token = generate_token();
    SessionRepository::new(Arc::new(db.clone()))
        .create(&token, principal, ttl_minutes)
        .await?;
    Ok(format!("{SESSION_COOKIE}={token}"))
}

/// Collects a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
