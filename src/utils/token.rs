use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::models::user::Claims;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// Signs and verifies bearer tokens.
///
/// Built once at startup from configuration and cloned into the app state.
/// The secret lives inside the encoding/decoding keys; nothing in the
/// request path reads the environment, and there is no way to construct one
/// of these without going through config validation first.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Issues a signed token whose subject is the username.
    ///
    /// `iat`/`exp` are stamped here, so two tokens for the same user are
    /// only identical when issued within the same second.
    pub fn sign(&self, username: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verifies a token string and returns its claims.
    ///
    /// Signature and expiry are both checked; an expired token gets its own
    /// error kind, everything else (garbage, truncation, wrong secret,
    /// wrong algorithm) collapses into `Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
