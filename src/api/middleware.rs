//! Request authentication and the role check applied by every protected handler.

use crate::auth::{Claims, Role};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;
use tracing::debug;

/// Authorization scheme expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller, extracted from a valid bearer access token.
///
/// Using this extractor makes a handler reject unauthenticated requests with
/// 401; [`AuthUser::require`] then narrows access by role.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified token claims.
    pub claims: Claims,
}

impl AuthUser {
    /// Fails with 403 unless the caller holds `role`.
    ///
    /// # Errors
    /// Returns [`ApiError::Forbidden`] if the role is missing.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.claims.has_role(role) {
            Ok(())
        } else {
            debug!(username = %self.claims.username, ?role, "role check failed");
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Username of the caller.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.claims.username
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Authentication credentials were not provided".to_string())
        })?;

        let claims = state.auth.verify_access_token(token)?;
        Ok(Self { claims })
    }
}

/// Extracts the bearer token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenType;
    use axum::body::Body;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/vessels");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap().into_parts().0
    }

    fn user(is_staff: bool) -> AuthUser {
        AuthUser {
            claims: Claims {
                sub: "1".to_string(),
                username: "user".to_string(),
                is_staff,
                is_superuser: false,
                token_type: TokenType::Access,
                jti: "jti".to_string(),
                iat: 0,
                exp: 0,
            },
        }
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_or_wrong_scheme() {
        assert_eq!(bearer_token(&parts_with_header(None)), None);
        assert_eq!(bearer_token(&parts_with_header(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts_with_header(Some("Bearer "))), None);
    }

    #[test]
    fn test_require_staff() {
        assert!(user(true).require(Role::Staff).is_ok());
        assert!(matches!(
            user(false).require(Role::Staff),
            Err(ApiError::Forbidden(_))
        ));
        assert!(user(false).require(Role::Authenticated).is_ok());
        assert!(user(true).require(Role::Superuser).is_err());
    }
}
