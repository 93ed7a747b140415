use chrono::{Duration, Utc};
use configs::TokenScheme;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;

use super::domain::Claims;
use super::errors::AuthError;

/// Hex length of the random part of a legacy token.
const LEGACY_NONCE_HEX: usize = 32;

/// Issues and verifies bearer tokens for the configured scheme.
#[derive(Clone)]
pub struct TokenCodec {
    scheme: TokenScheme,
    secret: String,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(scheme: TokenScheme, secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self { scheme, secret: secret.into(), ttl: Duration::hours(ttl_hours) }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(cfg.token_scheme, cfg.jwt_secret.clone(), cfg.token_ttl_hours)
    }

    pub fn issue(&self, provider_id: &str) -> Result<String, AuthError> {
        match self.scheme {
            TokenScheme::Signed => {
                let now = Utc::now();
                let claims = Claims { sub: provider_id.to_string(), iat: now.timestamp(), exp: (now + self.ttl).timestamp() };
                encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))
            }
            TokenScheme::Legacy => Ok(legacy_token(provider_id)),
        }
    }

    /// Provider id carried by `token`.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        match self.scheme {
            TokenScheme::Signed => {
                let data = decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &Validation::default())
                    .map_err(|_| AuthError::Unauthorized)?;
                Ok(data.claims.sub)
            }
            TokenScheme::Legacy => legacy_provider_id(token).map(str::to_string).ok_or(AuthError::Unauthorized),
        }
    }
}

/// `nonce + id + nonce`. Unsigned: anyone who knows an id can forge one.
fn legacy_token(provider_id: &str) -> String {
    let mut nonce = [0u8; LEGACY_NONCE_HEX / 2];
    rand::thread_rng().fill_bytes(&mut nonce);
    let nonce = hex::encode(nonce);
    format!("{nonce}{provider_id}{nonce}")
}

fn legacy_provider_id(token: &str) -> Option<&str> {
    if token.len() <= 2 * LEGACY_NONCE_HEX || !token.is_ascii() {
        return None;
    }
    let (nonce, rest) = token.split_at(LEGACY_NONCE_HEX);
    let id = rest.strip_suffix(nonce)?;
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_round_trips_provider_id() {
        let codec = TokenCodec::new(TokenScheme::Signed, "secret", 1);
        let token = codec.issue("p-42").unwrap();
        assert_eq!(codec.verify(&token).unwrap(), "p-42");
    }

    #[test]
    fn signed_token_rejects_other_secret() {
        let token = TokenCodec::new(TokenScheme::Signed, "secret", 1).issue("p-42").unwrap();
        let other = TokenCodec::new(TokenScheme::Signed, "another", 1);
        assert!(matches!(other.verify(&token), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn expired_signed_token_is_rejected() {
        let codec = TokenCodec::new(TokenScheme::Signed, "secret", -2);
        let token = codec.issue("p-42").unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn legacy_token_embeds_id_between_equal_nonces() {
        let codec = TokenCodec::new(TokenScheme::Legacy, "", 1);
        let id = "6650c0ffee";
        let token = codec.issue(id).unwrap();
        let (head, tail) = (&token[..LEGACY_NONCE_HEX], &token[token.len() - LEGACY_NONCE_HEX..]);
        assert_eq!(head, tail);
        assert_eq!(&token[LEGACY_NONCE_HEX..token.len() - LEGACY_NONCE_HEX], id);
        assert_eq!(codec.verify(&token).unwrap(), id);
    }

    #[test]
    fn legacy_token_with_mismatched_nonces_is_rejected() {
        let codec = TokenCodec::new(TokenScheme::Legacy, "", 1);
        let forged = format!("{}p1{}", "a".repeat(32), "b".repeat(32));
        assert!(codec.verify(&forged).is_err());
        assert!(codec.verify("short").is_err());
    }
}
