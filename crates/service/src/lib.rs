//! Service layer of the marketplace.
//! - Entity stores and the generic per-kind CRUD services.
//! - Provider authentication (hashed passwords, bearer tokens).
//! - The aggregation layer producing the composed read views.

pub mod auth;
pub mod catalog;
pub mod crud;
pub mod errors;
pub mod marketplace;
pub mod runtime;
pub mod storage;

pub use crud::CrudService;
pub use errors::ServiceError;
pub use marketplace::{MarketError, Marketplace};
pub use runtime::Services;
