//! Organisation CRUD endpoints under `/api/organisations`.

use axum::{
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::Json,
};

use crate::error::{ApiError, AppError};
use crate::models::aggregate::{Organisation, OrganisationPayload};
use crate::server::AppState;

/// List every organisation with its HR contacts
#[utoipa::path(
    get,
    path = "/api/organisations",
    responses(
        (status = 200, description = "All organisations", body = [Organisation]),
        (status = 401, description = "No live session", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn list_organisations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organisation>>, AppError> {
    Ok(Json(state.organisations.list().await?))
}

/// Fetch one organisation
#[utoipa::path(
    get,
    path = "/api/organisations/{id}",
    params(("id" = i64, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Organisation found", body = Organisation),
        (status = 401, description = "No live session", body = ApiError),
        (status = 404, description = "Organisation not found", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn get_organisation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Organisation>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.organisations.get(id).await?))
}

/// Create an organisation together with its HR contacts
#[utoipa::path(
    post,
    path = "/api/organisations",
    request_body = OrganisationPayload,
    responses(
        (status = 201, description = "Organisation created", body = Organisation, headers(
            ("Location", description = "URL of the created organisation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No live session", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn create_organisation(
    State(state): State<AppState>,
    payload: Result<Json<OrganisationPayload>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Organisation>), AppError> {
    let Json(payload) = payload?;
    let saved = state.organisations.create(payload).await?;

    let location = match saved.id {
        Some(id) => format!("/api/organisations/{id}"),
        None => "/api/organisations".to_string(),
    };
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    ))
}

/// Replace an organisation's name, address and HR contacts
#[utoipa::path(
    put,
    path = "/api/organisations/{id}",
    params(("id" = i64, Path, description = "Organisation id")),
    request_body = OrganisationPayload,
    responses(
        (status = 200, description = "Organisation updated", body = Organisation),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No live session", body = ApiError),
        (status = 404, description = "Organisation not found", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn update_organisation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<OrganisationPayload>, JsonRejection>,
) -> Result<Json<Organisation>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.organisations.update(id, payload).await?))
}

/// Delete an organisation and its HR contacts
#[utoipa::path(
    delete,
    path = "/api/organisations/{id}",
    params(("id" = i64, Path, description = "Organisation id")),
    responses(
        (status = 204, description = "Organisation deleted"),
        (status = 401, description = "No live session", body = ApiError),
        (status = 404, description = "Organisation not found", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn delete_organisation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.organisations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every organisation
#[utoipa::path(
    delete,
    path = "/api/organisations",
    responses(
        (status = 204, description = "All organisations deleted"),
        (status = 401, description = "No live session", body = ApiError)
    ),
    tag = "organisations"
)]
pub async fn delete_all_organisations(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.organisations.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
