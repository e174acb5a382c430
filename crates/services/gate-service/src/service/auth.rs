//! Credential checks and token issuance.

use async_trait::async_trait;
use serde::Serialize;

use auth_service_lib::TokenPair;
use common::{AppError, AppResult};
use domain::validation::require_non_empty;
use domain::{verify_password, User, UserResponse, DUMMY_HASH};

use super::manager::GateManager;

/// Successful login: a token pair plus the public profile.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub user: UserResponse,
}

/// Authentication use cases. These run before a caller identity exists.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check an email/password pair against an active account.
    ///
    /// # Errors
    /// `NotFound` for an unknown email, `Forbidden` for a wrong password or a
    /// malformed stored hash, `Blocked` when the account is blocked.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    /// Authenticate and issue a token pair.
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse>;

    /// Exchange a refresh token for a new pair.
    ///
    /// The role comes from the refresh token's claims, so role changes take
    /// effect at the next login.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;
}

#[async_trait]
impl AuthService for GateManager {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = require_non_empty("email", email)?;
        if password.is_empty() {
            return Err(AppError::invalid("password is required"));
        }

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            // Equalize timing with the known-email path.
            let _ = verify_password(password, DUMMY_HASH);
            return Err(AppError::NotFound);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "password mismatch");
            return Err(AppError::Forbidden);
        }

        if user.is_blocked() {
            tracing::warn!(user_id = %user.id, "blocked account attempted to authenticate");
            return Err(AppError::Blocked);
        }

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self.authenticate(email, password).await?;
        let tokens = self.tokens.issue_pair(user.id, user.role)?;

        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        self.metrics.record_user("login");

        Ok(LoginResponse {
            tokens,
            user: UserResponse::from(user),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let user = self
            .store
            .find_user_with_deleted(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.is_deleted() {
            return Err(AppError::Unauthorized);
        }
        if user.is_blocked() {
            return Err(AppError::Blocked);
        }

        self.tokens.issue_pair(claims.sub, claims.role)
    }
}
