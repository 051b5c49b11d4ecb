//! Authentication: password verification and JWT issuance.
//!
//! Tokens are HS256-signed and carry the user's role flags, so protected
//! endpoints authorize from the claims alone. Refresh tokens can be revoked;
//! revoked token ids are kept until the token would have expired anyway.

use crate::config::AuthConfig;
use crate::db::{StoreError, User, UserRepository};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, wrong password or inactive account.
    #[error("No active account found with the given credentials")]
    InvalidCredentials,
    /// Token failed signature, format or expiry checks.
    #[error("Given token not valid: {0}")]
    InvalidToken(String),
    /// An access token was used where a refresh token is required, or the reverse.
    #[error("Token has wrong type")]
    WrongTokenType,
    /// Refresh token was revoked.
    #[error("Token is revoked")]
    Revoked,
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    /// Configured lifetime pushes the expiry past the representable range.
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,
    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
    /// Blocking task did not complete.
    #[error("background task failed: {0}")]
    Task(String),
    /// User lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// Capability required by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Any authenticated user.
    Authenticated,
    /// Staff (admin) user.
    Staff,
    /// Superuser.
    Superuser,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Username.
    pub username: String,
    /// Staff flag at issue time.
    pub is_staff: bool,
    /// Superuser flag at issue time.
    pub is_superuser: bool,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Unique token id.
    pub jti: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Returns true if the claims grant `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Authenticated => true,
            Role::Staff => self.is_staff,
            Role::Superuser => self.is_superuser,
        }
    }

    /// User id as stored in the database.
    ///
    /// # Errors
    /// Returns error if `sub` is not numeric.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("malformed subject".to_string()))
    }
}

/// Access and refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
}

/// Password and token operations.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    hash_cost: u32,
    /// Revoked refresh token ids mapped to their expiry.
    revoked: DashMap<String, i64>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("revoked", &self.revoked.len())
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Builds the service from configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: Duration::try_minutes(config.access_token_minutes)
                .unwrap_or(Duration::MAX),
            refresh_ttl: Duration::try_days(config.refresh_token_days).unwrap_or(Duration::MAX),
            hash_cost: config.password_hash_cost,
            revoked: DashMap::new(),
        }
    }

    /// Hashes a password with the configured bcrypt cost on the blocking pool.
    ///
    /// # Errors
    /// Returns error if bcrypt fails.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let cost = self.hash_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))??;
        Ok(hash)
    }

    /// Verifies `username`/`password` against the stored hash.
    ///
    /// Returns `None` for unknown users, wrong passwords and inactive
    /// accounts.
    ///
    /// # Errors
    /// Returns error only if the user lookup itself fails.
    pub async fn authenticate(
        &self,
        users: &dyn UserRepository,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let Some(user) = users.find_by_username(username).await? else {
            debug!(username, "login for unknown user");
            return Ok(None);
        };

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
            .unwrap_or_else(|e| {
                warn!(username = %user.username, "stored password hash is unusable: {}", e);
                false
            });

        if verified && user.is_active {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Authenticates the credentials and issues a token pair.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if authentication fails.
    pub async fn issue_token(
        &self,
        users: &dyn UserRepository,
        username: &str,
        password: &str,
    ) -> Result<(User, TokenPair), AuthError> {
        let user = self
            .authenticate(users, username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let pair = TokenPair {
            access: self.create_token(&user, TokenType::Access, self.access_ttl)?,
            refresh: self.create_token(&user, TokenType::Refresh, self.refresh_ttl)?,
        };
        Ok((user, pair))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The user must still exist and be active; the new token carries the
    /// user's current role flags.
    ///
    /// # Errors
    /// Returns error if the refresh token is invalid, expired or revoked.
    pub async fn refresh_token(
        &self,
        users: &dyn UserRepository,
        refresh_token: &str,
    ) -> Result<String, AuthError> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        let user = users
            .find_by_id(claims.user_id()?)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AuthError::InvalidToken("user not found".to_string()))?;

        self.create_token(&user, TokenType::Access, self.access_ttl)
    }

    /// Revokes a refresh token so it can no longer be exchanged.
    ///
    /// # Errors
    /// Returns error if the token is not a valid refresh token.
    pub fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        self.prune_revoked();
        self.revoked.insert(claims.jti, claims.exp);
        Ok(())
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    /// Returns error if the token is invalid, expired or not an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenType::Access)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType);
        }
        if expected == TokenType::Refresh && self.revoked.contains_key(&claims.jti) {
            return Err(AuthError::Revoked);
        }
        Ok(claims)
    }

    fn create_token(
        &self,
        user: &User,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::LifetimeOutOfRange)?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            token_type,
            jti: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Drops revocation entries whose tokens have expired.
    fn prune_revoked(&self) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp >= now);
    }
}
