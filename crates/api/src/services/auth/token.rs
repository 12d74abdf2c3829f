//! HS256 bearer tokens.
//!
//! The subject claim carries the customer ID. Tokens expire after
//! the configured validity; there is no leeway.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed access tokens.
pub struct JwtTokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl JwtTokenProvider {
    /// Create a provider signing with `secret`, issuing tokens valid for `validity`.
    #[must_use]
    pub fn new(secret: &SecretString, validity: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            validity,
        }
    }

    /// Sign a token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn create_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let validity = i64::try_from(self.validity.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(validity),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenCreation)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the signature, algorithm, or
    /// expiry check fails.
    pub fn payload(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AuthError::InvalidToken
            })
    }
}

impl fmt::Debug for JwtTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenProvider")
            .field("keys", &"[REDACTED]")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
