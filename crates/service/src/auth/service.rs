use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use models::credential::{CredentialCreate, CredentialUpdate};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::errors::AuthError;
use super::token::TokenCodec;
use crate::crud::CredentialService;

pub const PASSWORD_ALGORITHM: &str = "argon2";

fn dummy_hash() -> &'static str {
    static DUMMY: Lazy<String> = Lazy::new(|| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(b"unused-credential", &salt)
            .map(|h| h.to_string())
            .unwrap_or_default()
    });
    DUMMY.as_str()
}

/// Provider password storage and token issuance, independent of web framework.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialService,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(credentials: CredentialService, tokens: TokenCodec) -> Self {
        Self { credentials, tokens }
    }

    /// Store (or rotate) the password hash for a provider.
    pub async fn set_password(&self, provider_id: &str, password: &str) -> Result<(), AuthError> {
        let hash = Self::hash_password(password)?;
        self.store_hash(provider_id, hash).await
    }

    /// Argon2 PHC string for `password`; blank passwords are rejected.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        if password.trim().is_empty() {
            return Err(AuthError::Validation("password must not be empty".into()));
        }
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    #[instrument(skip(self, hash), fields(provider_id = %provider_id))]
    pub async fn store_hash(&self, provider_id: &str, hash: String) -> Result<(), AuthError> {
        let rotated = self
            .credentials
            .update(provider_id, CredentialUpdate { password_hash: Some(hash.clone()) })
            .await?;
        if rotated.is_none() {
            let input = CredentialCreate { password_hash: hash, password_algorithm: PASSWORD_ALGORITHM.into() };
            self.credentials.create_with_id(provider_id.to_string(), input).await?;
        }
        info!(provider_id = %provider_id, rotated = rotated.is_some(), "provider_password_set");
        Ok(())
    }

    pub async fn remove(&self, provider_id: &str) -> Result<(), AuthError> {
        self.credentials.delete(provider_id).await?;
        Ok(())
    }

    /// Constant-time check of `password` against the stored hash.
    /// Providers without a stored credential never verify, but still pay
    /// for one argon2 verification.
    pub async fn verify_password(&self, provider_id: &str, password: &str) -> Result<(), AuthError> {
        let Some(cred) = self.credentials.get_by_id(provider_id).await? else {
            Self::burn_verify(password);
            return Err(AuthError::Unauthorized);
        };
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            debug!(provider_id = %provider_id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }

    /// Verify against a throwaway hash so rejections that never reach a
    /// stored credential cost the same as a wrong password.
    pub fn burn_verify(password: &str) {
        if let Ok(parsed) = PasswordHash::new(dummy_hash()) {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
    }

    pub fn issue_token(&self, provider_id: &str) -> Result<String, AuthError> {
        self.tokens.issue(provider_id)
    }

    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token)
    }
}
