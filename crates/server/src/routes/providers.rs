use axum::{
    extract::{Multipart, Path, State},
    routing::get,
    Router,
};
use common::ApiResponse;
use models::provider::{Provider, ProviderCreate, ProviderUpdate};

use crate::errors::ApiError;
use crate::startup::AppState;
use crate::uploads::{read_form, UploadedForm};

#[utoipa::path(get, path = "/providers", tag = "providers", responses((status = 200, description = "All providers", body = crate::openapi::EnvelopeDoc)))]
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Provider>>, ApiError> {
    let providers = state.services.providers.get_all().await?;
    Ok(ApiResponse::ok(providers, "Providers fetched successfully"))
}

#[utoipa::path(
    get, path = "/providers/{id}", tag = "providers",
    params(("id" = String, Path, description = "Provider id")),
    responses((status = 200, description = "Provider, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Provider>, ApiError> {
    Ok(match state.services.providers.get_by_id(&id).await? {
        Some(p) => ApiResponse::ok(p, "Provider fetched successfully"),
        None => ApiResponse::fail("Provider not found"),
    })
}

#[utoipa::path(
    post, path = "/providers", tag = "providers",
    request_body(content = crate::openapi::ProviderFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created", body = crate::openapi::EnvelopeDoc),
        (status = 400, description = "Invalid fields or images", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<ApiResponse<Provider>, ApiError> {
    let mut form = read_form(multipart, &state.uploads).await?;
    let files = form.take_files();
    files.settle(create_from(&state, form).await).await
}

async fn create_from(state: &AppState, form: UploadedForm) -> Result<ApiResponse<Provider>, ApiError> {
    let input: ProviderCreate = form.into_input()?;
    input
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Provider not created: {e}")))?;
    let created = state.services.market.create_provider(input).await?;
    Ok(ApiResponse::ok(created, "Provider created successfully"))
}

#[utoipa::path(
    put, path = "/providers/{id}", tag = "providers",
    params(("id" = String, Path, description = "Provider id")),
    request_body(content = crate::openapi::ProviderFormDoc, content_type = "multipart/form-data"),
    responses((status = 200, description = "Updated, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<ApiResponse<Provider>, ApiError> {
    let mut form = read_form(multipart, &state.uploads).await?;
    let files = form.take_files();
    files.settle(update_from(&state, &id, form).await).await
}

async fn update_from(state: &AppState, id: &str, form: UploadedForm) -> Result<ApiResponse<Provider>, ApiError> {
    let patch: ProviderUpdate = form.into_input()?;
    patch
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Provider not updated: {e}")))?;
    Ok(match state.services.market.update_provider(id, patch).await? {
        Some(v) => ApiResponse::ok(v, "Provider updated successfully"),
        None => ApiResponse::fail("Provider not updated"),
    })
}

#[utoipa::path(
    delete, path = "/providers/{id}", tag = "providers",
    params(("id" = String, Path, description = "Provider id")),
    responses((status = 200, description = "Removed provider, or `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<Provider>, ApiError> {
    let Some(existing) = state.services.providers.get_by_id(&id).await? else {
        return Ok(ApiResponse::fail("Provider not deleted"));
    };
    state.services.market.delete_provider(&id).await?;
    Ok(ApiResponse::ok(existing, "Provider deleted successfully"))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(list).post(create))
        .route("/providers/:id", get(get_one).put(update).delete(delete))
}
