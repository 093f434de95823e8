use axum::routing::get;
use axum::Router;

use crate::handlers::kpi;
use crate::state::AppState;

/// Routes mounted at `/kpi`.
///
/// ```text
/// GET    /     summary (?platform=&startDate=&endDate=)
/// POST   /     single-campaign drill-down
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(kpi::get_kpi).post(kpi::get_kpi_detail))
}
