//! Provider authentication: password hashes in their own collection and
//! stateless bearer tokens that carry the provider id.

pub mod domain;
pub mod errors;
pub mod service;
pub mod token;

pub use service::AuthService;
