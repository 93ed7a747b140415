use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `{ data, success, message }`; `data` is null on most failures.
#[derive(ToSchema)]
pub struct EnvelopeDoc {
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestDoc {
    pub provider_id: String,
    pub service_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequestDoc { pub id: String, pub username: String, pub password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFormDoc {
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "clinic")]
    pub kind: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_coming_soon: Option<bool>,
    /// JSON array of `{ title, description }`.
    pub faqs: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub gallery: Vec<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFormDoc {
    pub name: String,
    pub price: String,
    pub provider: String,
    pub description: Option<String>,
    pub discount: Option<String>,
    pub valid_discount_date: Option<String>,
    pub recommended: Option<bool>,
    pub cancellation: Option<bool>,
    pub consultation: Option<String>,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub package_highlights: Vec<String>,
    pub highlights: Vec<String>,
    pub included: Vec<String>,
    pub excluded: Vec<String>,
    pub categories: Vec<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub gallery: Vec<Vec<u8>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::main::home,
        crate::routes::main::search,
        crate::routes::main::service_detail,
        crate::routes::main::providers,
        crate::routes::main::provider_detail,
        crate::routes::main::book,
        crate::routes::main::login,
        crate::routes::providers::list,
        crate::routes::providers::get_one,
        crate::routes::providers::create,
        crate::routes::providers::update,
        crate::routes::providers::delete,
        crate::routes::services::list,
        crate::routes::services::get_one,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            EnvelopeDoc,
            BookingRequestDoc,
            LoginRequestDoc,
            ProviderFormDoc,
            ServiceFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "main"),
        (name = "providers"),
        (name = "services")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_marketplace_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/main", "/main/services/{id}", "/main/login", "/providers/{id}", "/services"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
