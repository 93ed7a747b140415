//! Client-facing aggregation routes under `/main`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use common::ApiResponse;
use models::provider::Provider;
use serde::Serialize;
use service::auth::domain::{AuthToken, LoginInput};
use service::marketplace::views::{Ack, BookingInput, HomeView, ProviderDetail, ServiceDetail, ServiceWithProvider};
use service::marketplace::ServiceQuery;
use service::MarketError;

use crate::errors::ApiError;
use crate::startup::AppState;

/// Login payload: the token on success, an empty ack on rejection.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LoginReply {
    Token(AuthToken),
    Rejected(Ack),
}

#[utoipa::path(get, path = "/main", tag = "main", responses((status = 200, description = "Providers, recommended and all attached services", body = crate::openapi::EnvelopeDoc)))]
pub async fn home(State(state): State<AppState>) -> Result<ApiResponse<HomeView>, ApiError> {
    let view = state.services.market.home().await?;
    Ok(ApiResponse::ok(view, "Data fetched successfully"))
}

#[utoipa::path(
    get, path = "/main/services", tag = "main",
    params(
        ("keyword" = Option<String>, Query, description = "Case-insensitive match on name, description or price"),
        ("sort" = Option<String>, Query, description = "`price:asc` or `price:desc`"),
        ("filter" = Option<String>, Query, description = "`has_discount` or `is_package`")
    ),
    responses((status = 200, description = "Matching services with provider names", body = crate::openapi::EnvelopeDoc))
)]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ServiceWithProvider>>, ApiError> {
    let Query(query) = query?;
    let services = state.services.market.search(&query).await?;
    Ok(ApiResponse::ok(services, "Services fetched successfully"))
}

#[utoipa::path(
    get, path = "/main/services/{id}", tag = "main",
    params(("id" = String, Path, description = "Service id")),
    responses((status = 200, description = "Service with provider info and related services; `success=false` when unknown", body = crate::openapi::EnvelopeDoc))
)]
pub async fn service_detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<ServiceDetail>, ApiError> {
    let detail = state.services.market.service_detail(&id).await?;
    Ok(ApiResponse::ok(detail, "Service fetched successfully"))
}

#[utoipa::path(get, path = "/main/providers", tag = "main", responses((status = 200, description = "All providers", body = crate::openapi::EnvelopeDoc)))]
pub async fn providers(State(state): State<AppState>) -> Result<ApiResponse<Vec<Provider>>, ApiError> {
    let providers = state.services.market.providers().await?;
    Ok(ApiResponse::ok(providers, "Providers fetched successfully"))
}

#[utoipa::path(
    get, path = "/main/providers/{id}", tag = "main",
    params(("id" = String, Path, description = "Provider id")),
    responses((status = 200, description = "Provider with services, reviews and book requests", body = crate::openapi::EnvelopeDoc))
)]
pub async fn provider_detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<ApiResponse<ProviderDetail>, ApiError> {
    let detail = state.services.market.provider_detail(&id).await?;
    Ok(ApiResponse::ok(detail, "Providers fetched successfully"))
}

#[utoipa::path(
    post, path = "/main/book", tag = "main",
    request_body = crate::openapi::BookingRequestDoc,
    responses((status = 200, description = "Booking stored, or `success=false` on unknown ids", body = crate::openapi::EnvelopeDoc))
)]
pub async fn book(
    State(state): State<AppState>,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> Result<ApiResponse<Ack>, ApiError> {
    let Json(input) = payload?;
    match state.services.market.book(input).await {
        Ok(_) => Ok(ApiResponse::ok(Ack::default(), "Book request created successfully")),
        Err(e) if e.is_expected() => Ok(ApiResponse::fail_with(Ack::default(), e.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post, path = "/main/login", tag = "main",
    request_body = crate::openapi::LoginRequestDoc,
    responses((status = 200, description = "Token on success; one generic failure message otherwise", body = crate::openapi::EnvelopeDoc))
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<ApiResponse<LoginReply>, ApiError> {
    let Json(input) = payload?;
    match state.services.market.login(input).await {
        Ok(token) => Ok(ApiResponse::ok(LoginReply::Token(token), "Login successful")),
        Err(e @ MarketError::InvalidCredentials) => Ok(ApiResponse::fail_with(LoginReply::Rejected(Ack::default()), e.to_string())),
        Err(e) => Err(e.into()),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/main", get(home))
        .route("/main/services", get(search))
        .route("/main/services/:id", get(service_detail))
        .route("/main/providers", get(providers))
        .route("/main/providers/:id", get(provider_detail))
        .route("/main/book", post(book))
        .route("/main/login", post(login))
}
