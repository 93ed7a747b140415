use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use common::types::Health;
use models::book_request::BookRequest;
use models::job::Job;
use models::provider_review::ProviderReview;
use models::service_category::ServiceCategory;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::startup::AppState;

pub mod crud;
pub mod main;
pub mod providers;
pub mod services;

/// Cap for whole request bodies; multipart forms carry up to eleven images.
pub const BODY_LIMIT: usize = 60 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: marketplace views, entity CRUD,
/// uploaded files and API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(&state.uploads.root);

    let api = Router::new()
        .route("/health", get(health))
        .merge(main::routes())
        .merge(providers::routes())
        .merge(services::routes())
        .merge(crud::routes::<Job>("/jobs"))
        .merge(crud::routes::<ServiceCategory>("/serviceCategories"))
        .merge(crud::routes::<ProviderReview>("/providerReviews"))
        .merge(crud::read_delete_routes::<BookRequest>("/bookRequests"))
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/docs-json", ApiDoc::openapi()))
        .merge(api)
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors)
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
}
