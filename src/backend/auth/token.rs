/**
 * Token Verification and JWT Implementation
 *
 * This module defines the `Authenticator` capability consumed by the HTTP
 * middleware and the WebSocket connection gate, plus the HS256 JWT
 * implementation used in production.
 */

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest secret accepted for HS256 signing.
const MIN_SECRET_LEN: usize = 32;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The configured signing secret is too short to be safe.
    #[error("JWT secret key must be at least {MIN_SECRET_LEN} bytes long")]
    WeakSecret,

    /// The token failed verification (bad signature, expired, garbage).
    #[error("invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// The identity bound to a verified credential.
///
/// `subject` is the token's `sub` claim, used verbatim as the sender name
/// on everything the connection publishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Credential verification capability.
///
/// Implementations must be cheap to call per request; verification is a
/// pure signature check, no I/O.
pub trait Authenticator: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Token subject (the user name)
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// HS256 JWT authenticator.
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration: Duration,
}

impl JwtAuthenticator {
    /// Create an authenticator from a shared secret.
    ///
    /// Rejects secrets shorter than 32 bytes outright rather than signing
    /// with a weak key.
    pub fn new(secret: &str, expiration: Duration) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration,
        })
    }

    /// Issue a token for `subject`, expiring after the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = unix_now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.expiration.as_secs(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::InvalidToken)
    }
}

impl Authenticator for JwtAuthenticator {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(AuthError::InvalidToken)?;
        Ok(Identity {
            subject: data.claims.sub,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
