//! # Tests for Handlers
//!
//! Direct handler calls with hand-built state; routing and the session layer
//! are covered by the integration tests.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sea_orm::{Database, DatabaseConnection};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers::{auth, health, root};
use crate::server::AppState;
use crate::services::current_user::{OidcIdentity, Principal};

fn disconnected_state() -> AppState {
    AppState::new(AppConfig::default(), DatabaseConnection::default())
        .expect("Failed to build test state")
}

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "academicerp");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_reports_ok_when_database_answers() {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open sqlite");
    let state = AppState::new(AppConfig::default(), db).expect("Failed to build test state");

    let (status, Json(body)) = health(State(state)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.database, "ok");
}

#[tokio::test]
async fn test_health_degrades_without_database() {
    let (status, Json(body)) = health(State(disconnected_state())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body.status, "degraded");
}

#[tokio::test]
async fn test_me_rejects_anonymous_principal() {
    let err = auth::me(Principal::Anonymous).await.unwrap_err();

    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_projects_oidc_identity() {
    let principal = Principal::Oidc(OidcIdentity {
        subject: "1099".into(),
        full_name: Some("Asha Rao".into()),
        given_name: None,
        email: Some("asha@example.edu".into()),
    });

    let Json(user) = auth::me(principal).await.unwrap();

    assert_eq!(user.name, "Asha Rao");
    assert_eq!(user.email, "asha@example.edu");
}

#[tokio::test]
async fn test_exchange_without_credentials_is_misconfigured() {
    let request = Ok(Json(auth::ExchangeRequest {
        code: "abc".into(),
    }));

    let err = auth::exchange(State(disconnected_state()), request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
