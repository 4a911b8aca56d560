//! HS256 JWT implementation of [`TokenService`].
//!
//! Tokens carry the user id plus issued-at and expiry claims. The library's
//! own expiry check is disabled; expiry is compared against the injected
//! clock so it stays testable and explicit.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::UserId;
use crate::domain::ports::{TokenError, TokenService};

/// Lifetime in days of every issued token, independent of the advertised
/// expiry.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

fn token_lifetime() -> Duration {
    Duration::days(TOKEN_LIFETIME_DAYS)
}

/// Signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Zeroizing<String>,
    /// Expiry label echoed to clients as `expiresIn`.
    pub expires_in: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserId) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            id: user.to_string(),
            iat: now.timestamp(),
            exp: (now + token_lifetime()).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            })?;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }

        claims
            .id
            .parse()
            .map_err(|err: uuid::Error| TokenError::invalid(format!("bad subject: {err}")))
    }
}
