use axum::{
    extract::{Multipart, Path, State},
    routing::get,
    Router,
};
use common::ApiResponse;
use models::service::{Service, ServiceCreate, ServiceUpdate};

use crate::errors::ApiError;
use crate::startup::AppState;
use crate::uploads::{read_form, UploadedForm};

#[utoipa::path(get, path = "/services", tag = "services", responses((status = 200, description = "All services", body = crate::openapi::EnvelopeDoc)))]
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Service>>, ApiError> {
    let services = state.services.services.get_all().await?;
    Ok(ApiResponse::ok(services, "Services fetched successfully"))
}

#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses((status = 200, description = "Service, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Service>, ApiError> {
    Ok(match state.services.services.get_by_id(&id).await? {
        Some(s) => ApiResponse::ok(s, "Service fetched successfully"),
        None => ApiResponse::fail("Service not found"),
    })
}

#[utoipa::path(
    post, path = "/services", tag = "services",
    request_body(content = crate::openapi::ServiceFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created, or `success=false` when the provider is unknown", body = crate::openapi::EnvelopeDoc),
        (status = 400, description = "Invalid fields or images", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<ApiResponse<Service>, ApiError> {
    let mut form = read_form(multipart, &state.uploads).await?;
    let files = form.take_files();
    files.settle(create_from(&state, form).await).await
}

async fn create_from(state: &AppState, form: UploadedForm) -> Result<ApiResponse<Service>, ApiError> {
    let input: ServiceCreate = form.into_input()?;
    input
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Service not created: {e}")))?;
    let created = state.services.market.create_service(input).await?;
    Ok(ApiResponse::ok(created, "Service created successfully"))
}

#[utoipa::path(
    put, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id")),
    request_body(content = crate::openapi::ServiceFormDoc, content_type = "multipart/form-data"),
    responses((status = 200, description = "Updated, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<ApiResponse<Service>, ApiError> {
    let mut form = read_form(multipart, &state.uploads).await?;
    let files = form.take_files();
    files.settle(update_from(&state, &id, form).await).await
}

async fn update_from(state: &AppState, id: &str, form: UploadedForm) -> Result<ApiResponse<Service>, ApiError> {
    let patch: ServiceUpdate = form.into_input()?;
    patch
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Service not updated: {e}")))?;
    Ok(match state.services.market.update_service(id, patch).await? {
        Some(v) => ApiResponse::ok(v, "Service updated successfully"),
        None => ApiResponse::fail("Service not updated"),
    })
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses((status = 200, description = "Removed service, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Service>, ApiError> {
    let Some(existing) = state.services.services.get_by_id(&id).await? else {
        return Ok(ApiResponse::fail("Service not deleted"));
    };
    state.services.services.delete(&id).await?;
    Ok(ApiResponse::ok(existing, "Service deleted successfully"))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list).post(create))
        .route("/services/:id", get(get_one).put(update).delete(delete))
}
