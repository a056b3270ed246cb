pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub typ: TokenKind,
    /// Unique per token, so two refresh tokens minted in the same second differ
    pub jti: Uuid,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Expected {expected:?} token")]
    WrongKind { expected: TokenKind },
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 tokens with the configured secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::days(config.refresh_token_days),
        }
    }

    pub fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            typ: kind,
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(JwtError::TokenGeneration)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, expiry and issuer, then the token kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::InvalidToken)?;

        if data.claims.typ != expected {
            return Err(JwtError::WrongKind { expected });
        }
        Ok(data.claims)
    }
}

/// Hex SHA-256 digest under which refresh tokens are stored
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
