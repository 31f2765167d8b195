//! # Server Configuration
//!
//! Router assembly, shared state and the listener loop for the Academic ERP API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::OrganisationRepository;
use crate::services::{OAuthExchangeService, OrganisationService};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub organisations: OrganisationService,
    pub oauth: Arc<OAuthExchangeService>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Result<Self, reqwest::Error> {
        let db = Arc::new(db);
        let oauth = OAuthExchangeService::new(config.google.clone())?;
        let organisations =
            OrganisationService::new(Arc::new(OrganisationRepository::new(db.clone())));

        Ok(Self {
            config: Arc::new(config),
            db,
            organisations,
            oauth: Arc::new(oauth),
        })
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    // The fallback sits inside the session layer, so unknown /api paths answer
    // 401 to anonymous callers and 404 to signed-in ones.
    let api = Router::new()
        .route(
            "/organisations",
            get(handlers::organisations::list_organisations)
                .post(handlers::organisations::create_organisation)
                .delete(handlers::organisations::delete_all_organisations),
        )
        .route(
            "/organisations/{id}",
            get(handlers::organisations::get_organisation)
                .put(handlers::organisations::update_organisation)
                .delete(handlers::organisations::delete_organisation),
        )
        .route("/auth/me", get(handlers::auth::me))
        .fallback(handlers::api_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/oauth2/authorization/google", get(handlers::login::authorize))
        .route("/login/oauth2/code/google", get(handlers::login::callback))
        .route("/oauth2/exchange", post(handlers::auth::exchange))
        .route(
            "/logout",
            get(handlers::login::logout).post(handlers::login::logout),
        )
        .nest("/api", api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Allows the configured frontend origin with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            tracing::warn!(
                origin = %config.frontend_origin,
                error = %err,
                "Frontend origin is not a valid header value; cross-origin requests will be refused"
            );
            layer
        }
    }
}

/// Starts the server and serves until Ctrl+C
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .with_context(|| format!("Invalid server address: {}", config.api_bind_addr))?;
    let profile = config.profile.clone();

    let state = AppState::new(config, db).context("Failed to build HTTP client")?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::organisations::list_organisations,
        crate::handlers::organisations::get_organisation,
        crate::handlers::organisations::create_organisation,
        crate::handlers::organisations::update_organisation,
        crate::handlers::organisations::delete_organisation,
        crate::handlers::organisations::delete_all_organisations,
        crate::handlers::auth::me,
        crate::handlers::auth::exchange,
        crate::handlers::login::authorize,
        crate::handlers::login::callback,
        crate::handlers::login::logout,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::HealthStatus,
            crate::models::Organisation,
            crate::models::OrganisationHr,
            crate::models::OrganisationPayload,
            crate::models::HrContactPayload,
            crate::services::CurrentUser,
            crate::services::AuthTokenResponse,
            crate::handlers::auth::ExchangeRequest,
            crate::error::ApiError,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "organisations", description = "Organisation and HR contact management"),
        (name = "auth", description = "Current user and token exchange"),
        (name = "login", description = "Browser login flow"),
    ),
    info(
        title = "Academic ERP API",
        description = "Organisation management API with Google sign-in",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
