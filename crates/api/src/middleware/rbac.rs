//! Role gates for planner routes.
//!
//! Viewers read campaigns, the calendar, reviews and KPIs. Editors also
//! write campaigns, run generation, open review rounds and approve. Only
//! admins may archive. Review answers are gated per review row instead, see
//! [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use regatta_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller and check `allowed`, rejecting with 403 and `denied`.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&AuthUser) -> bool,
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(&user) {
        Ok(user)
    } else {
        tracing::debug!(user = %user.email, role = %user.role, "Role gate refused request");
        Err(AppError::Core(CoreError::Forbidden(denied.to_string())))
    }
}

/// Admin only: the archive override.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, AuthUser::is_admin, "Only admins can archive campaigns")
            .await
            .map(RequireAdmin)
    }
}

/// Editor or admin: campaign writes, generation, review rounds, approval and
/// manual activity entries.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(
            parts,
            state,
            AuthUser::can_edit_campaigns,
            "Viewers cannot change campaigns; an editor or admin role is required",
        )
        .await
        .map(RequireEditor)
    }
}

/// Any signed-in user. Used on read routes.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        gate(parts, state, |_| true, "").await.map(RequireAuth)
    }
}
