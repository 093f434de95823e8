use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity, campaign};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET, POST                 /
/// GET, PUT, PATCH, DELETE   /{id}
/// GET, POST                 /{id}/activity
/// POST                      /{id}/generate
/// POST                      /{id}/archive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campaign::list_campaigns).post(campaign::create_campaign),
        )
        .route(
            "/{id}",
            get(campaign::get_campaign)
                .put(campaign::update_campaign)
                .patch(campaign::patch_campaign)
                .delete(campaign::delete_campaign),
        )
        .route(
            "/{id}/activity",
            get(activity::list_activity).post(activity::create_activity),
        )
        .route("/{id}/generate", post(campaign::generate_content))
        .route("/{id}/archive", post(campaign::archive_campaign))
}
