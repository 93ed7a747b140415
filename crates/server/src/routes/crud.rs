//! JSON CRUD for record kinds that need no aggregation or uploads.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use common::ApiResponse;
use models::book_request::BookRequest;
use models::job::Job;
use models::provider_review::ProviderReview;
use models::service_category::ServiceCategory;
use models::{Record, Validate};
use serde::de::DeserializeOwned;
use service::CrudService;

use crate::errors::ApiError;
use crate::startup::AppState;

/// A record kind exposed over plain JSON routes, with the nouns used in
/// envelope messages.
pub trait Resource: Record {
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    fn service(state: &AppState) -> &CrudService<Self>;
}

impl Resource for Job {
    const SINGULAR: &'static str = "Job";
    const PLURAL: &'static str = "Jobs";

    fn service(state: &AppState) -> &CrudService<Self> {
        &state.services.jobs
    }
}

impl Resource for ServiceCategory {
    const SINGULAR: &'static str = "Service category";
    const PLURAL: &'static str = "Service categories";

    fn service(state: &AppState) -> &CrudService<Self> {
        &state.services.categories
    }
}

impl Resource for ProviderReview {
    const SINGULAR: &'static str = "Provider review";
    const PLURAL: &'static str = "Provider reviews";

    fn service(state: &AppState) -> &CrudService<Self> {
        &state.services.reviews
    }
}

impl Resource for BookRequest {
    const SINGULAR: &'static str = "Book request";
    const PLURAL: &'static str = "Book requests";

    fn service(state: &AppState) -> &CrudService<Self> {
        &state.services.book_requests
    }
}

pub async fn list<E: Resource>(State(state): State<AppState>) -> Result<ApiResponse<Vec<E>>, ApiError> {
    let items = E::service(&state).get_all().await?;
    Ok(ApiResponse::ok(items, format!("{} fetched successfully", E::PLURAL)))
}

pub async fn get_one<E: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<E>, ApiError> {
    Ok(match E::service(&state).get_by_id(&id).await? {
        Some(item) => ApiResponse::ok(item, format!("{} fetched successfully", E::SINGULAR)),
        None => ApiResponse::fail(format!("{} not found", E::SINGULAR)),
    })
}

pub async fn create<E>(
    State(state): State<AppState>,
    payload: Result<Json<E::Create>, JsonRejection>,
) -> Result<ApiResponse<E>, ApiError>
where
    E: Resource,
    E::Create: DeserializeOwned + Validate,
{
    let Json(input) = payload?;
    input
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("{} not created: {e}", E::SINGULAR)))?;
    let created = E::service(&state).create(input).await?;
    Ok(ApiResponse::ok(created, format!("{} created successfully", E::SINGULAR)))
}

pub async fn update<E>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<E::Update>, JsonRejection>,
) -> Result<ApiResponse<E>, ApiError>
where
    E: Resource,
    E::Update: DeserializeOwned + Validate,
{
    let Json(patch) = payload?;
    patch
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("{} not updated: {e}", E::SINGULAR)))?;
    Ok(match E::service(&state).update(&id, patch).await? {
        Some(item) => ApiResponse::ok(item, format!("{} updated successfully", E::SINGULAR)),
        None => ApiResponse::fail(format!("{} not updated", E::SINGULAR)),
    })
}

/// Returns the removed record; an unknown id is `"<Resource> not deleted"`.
pub async fn delete<E: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<E>, ApiError> {
    let svc = E::service(&state);
    let Some(existing) = svc.get_by_id(&id).await? else {
        return Ok(ApiResponse::fail(format!("{} not deleted", E::SINGULAR)));
    };
    svc.delete(&id).await?;
    Ok(ApiResponse::ok(existing, format!("{} deleted successfully", E::SINGULAR)))
}

/// `GET/POST <path>` and `GET/PUT/DELETE <path>/:id`.
pub fn routes<E>(path: &str) -> Router<AppState>
where
    E: Resource,
    E::Create: DeserializeOwned + Validate,
    E::Update: DeserializeOwned + Validate,
{
    Router::new()
        .route(path, get(list::<E>).post(create::<E>))
        .route(&format!("{path}/:id"), get(get_one::<E>).put(update::<E>).delete(delete::<E>))
}

/// Listing and removal only; records are created elsewhere.
pub fn read_delete_routes<E: Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(list::<E>))
        .route(&format!("{path}/:id"), get(get_one::<E>).delete(delete::<E>))
}
