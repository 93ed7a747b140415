use tracing::{info, instrument, warn};

use super::{MarketError, Marketplace};
use crate::auth::domain::{AuthToken, LoginInput};
use crate::auth::errors::AuthError;
use crate::auth::AuthService;

impl Marketplace {
    /// Check provider id, username and password; every mismatch yields the
    /// same `InvalidCredentials`.
    #[instrument(skip(self, input), fields(provider_id = %input.id))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthToken, MarketError> {
        let provider = self
            .providers
            .get_by_id(&input.id)
            .await?
            .filter(|p| p.username.as_deref() == Some(input.username.as_str()));
        let Some(provider) = provider else {
            // same argon2 cost as a wrong password
            AuthService::burn_verify(&input.password);
            return Err(MarketError::InvalidCredentials);
        };
        self.auth.verify_password(&provider.id, &input.password).await.map_err(credential_failure)?;

        let token = self.auth.issue_token(&provider.id).map_err(credential_failure)?;
        info!(provider_id = %provider.id, "provider_login");
        Ok(AuthToken { token })
    }

    /// Provider id carried by a previously issued token.
    pub fn verify_token(&self, token: &str) -> Result<String, MarketError> {
        self.auth.verify_token(token).map_err(|_| MarketError::InvalidCredentials)
    }
}

fn credential_failure(e: AuthError) -> MarketError {
    match e {
        AuthError::Unauthorized => MarketError::InvalidCredentials,
        other => {
            warn!(error = %other, code = other.code(), "credential check failed");
            MarketError::Store(crate::errors::ServiceError::Db(other.to_string()))
        }
    }
}
