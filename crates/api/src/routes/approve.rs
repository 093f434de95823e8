use axum::routing::post;
use axum::Router;

use crate::handlers::approve;
use crate::state::AppState;

/// Routes mounted at `/approve`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(approve::approve_campaign))
}
