use axum::routing::{get, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST, GET   /                 send_for_review, list_reviews (?campaignId=)
/// POST        /{id}/respond     respond_to_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review::list_reviews).post(review::send_for_review))
        .route("/{id}/respond", post(review::respond_to_review))
}
