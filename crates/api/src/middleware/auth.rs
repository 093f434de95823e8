//! Identity of the planner user behind a request.
//!
//! The sign-in provider issues an HS256 token; the planner UI forwards it as
//! `Authorization: Bearer <token>`. The decoded email is what activity rows,
//! review rows and notification e-mails name as the actor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use regatta_core::error::CoreError;
use regatta_core::roles::{can_edit, ROLE_ADMIN};
use regatta_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

const NO_TOKEN: &str = "Sign in required: no bearer token on the request";
const NOT_BEARER: &str = "Authorization header must have the form 'Bearer <token>'";
const BAD_TOKEN: &str = "Session token is invalid or has expired; sign in again";

/// The signed-in planner user.
///
/// Reviewers need no special role: any user whose email matches a review
/// row may answer it, which `respond_to_review` checks against `email`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Compared case-insensitively with `campaign_reviews.reviewer_email`.
    pub email: String,
    /// `ADMIN`, `EDITOR` or `VIEWER`.
    pub role: String,
}

impl AuthUser {
    /// May archive campaigns from any status and answer any review.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// May create, edit, generate and send campaigns for review.
    pub fn can_edit_campaigns(&self) -> bool {
        can_edit(&self.role)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// The raw token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized(NO_TOKEN))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized(NOT_BEARER))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims =
            validate_token(token, &state.config.jwt).map_err(|_| unauthorized(BAD_TOKEN))?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Core(CoreError::Unauthorized(msg)) => msg,
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_header_and_other_schemes_are_rejected() {
        assert_eq!(message(bearer_token(&HeaderMap::new()).unwrap_err()), NO_TOKEN);
        assert_eq!(message(bearer_token(&headers("Token abc")).unwrap_err()), NOT_BEARER);
        assert_eq!(message(bearer_token(&headers("Bearer   ")).unwrap_err()), NOT_BEARER);
    }

    #[test]
    fn role_checks() {
        let user = |role: &str| AuthUser {
            user_id: Uuid::new_v4(),
            email: "ann@shop.com".into(),
            role: role.into(),
        };
        assert!(user("ADMIN").is_admin());
        assert!(user("ADMIN").can_edit_campaigns());
        assert!(!user("EDITOR").is_admin());
        assert!(user("EDITOR").can_edit_campaigns());
        assert!(!user("VIEWER").can_edit_campaigns());
    }
}
