use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{hash_token, password, IssuedToken, TokenIssuer, TokenKind};
use crate::database::models::NewRefreshToken;
use crate::database::repository::{RefreshTokenRepository, UserRepository};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::user_service::normalize_email;

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
        }
    }

    /// Unknown email and wrong password fail identically, and both paths run
    /// exactly one hash verification.
    pub async fn login(&self, email: &str, password: String) -> ServiceResult<TokenPair> {
        let user = self.users.find_by_email(&normalize_email(email)).await?;
        let hash = user.as_ref().map(|u| u.password_hash.clone());

        let verified = password::verify_password(password, hash).await?;
        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!("Failed login attempt");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let purged = self.refresh_tokens.delete_expired(user.id, Utc::now()).await?;
        if purged > 0 {
            debug!("Purged {} expired refresh tokens for user {}", purged, user.id);
        }

        let access = self.tokens.issue(user.id, TokenKind::Access)?;
        let refresh = self.tokens.issue(user.id, TokenKind::Refresh)?;
        self.store_refresh_token(user.id, &refresh).await?;

        info!("User {} logged in", user.id);
        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    /// Exchange a stored refresh token for a fresh access token. The refresh
    /// token itself is not rotated.
    pub async fn refresh(&self, user_id: Uuid, token: &str) -> ServiceResult<String> {
        let stored = self
            .refresh_tokens
            .find_by_hash(&hash_token(token))
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        if stored.user_id != user_id {
            warn!("Refresh token presented by user {} belongs to another user", user_id);
            return Err(ServiceError::TokenOwnershipMismatch);
        }
        if stored.is_expired(Utc::now()) {
            return Err(ServiceError::TokenExpired);
        }

        let access = self.tokens.issue(user_id, TokenKind::Access)?;
        Ok(access.token)
    }

    /// Revoke one of the caller's refresh tokens
    pub async fn logout(&self, user_id: Uuid, token: &str) -> ServiceResult<()> {
        let token_hash = hash_token(token);
        let stored = self
            .refresh_tokens
            .find_by_hash(&token_hash)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or(ServiceError::InvalidToken)?;

        self.refresh_tokens.delete_by_hash(&stored.token_hash).await?;
        info!("User {} logged out", user_id);
        Ok(())
    }

    async fn store_refresh_token(&self, user_id: Uuid, issued: &IssuedToken) -> ServiceResult<()> {
        self.refresh_tokens
            .insert(NewRefreshToken {
                user_id,
                token_hash: hash_token(&issued.token),
                expires_at: issued.expires_at,
            })
            .await?;
        Ok(())
    }
}
