use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(product::search))
}
