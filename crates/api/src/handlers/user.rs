use axum::extract::State;
use axum::Json;
use regatta_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::UserListResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// Reviewer directory, ordered by name.
pub async fn list_users(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<UserListResponse>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(UserListResponse { users }))
}
