pub mod approve;
pub mod calendar;
pub mod campaigns;
pub mod health;
pub mod kpi;
pub mod products;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /campaigns                      list, create
/// /campaigns/{id}                 get, replace (PUT), patch, delete
/// /campaigns/{id}/activity        list, append
/// /campaigns/{id}/generate        run content generation (POST)
/// /campaigns/{id}/archive         admin archive override (POST)
///
/// /calendar                       month grid (GET)
///
/// /reviews                        send for review (POST), list by campaign (GET)
/// /reviews/{id}/respond           reviewer answer (POST)
///
/// /approve                        approve a campaign (POST)
///
/// /users                          reviewer directory (GET)
///
/// /kpi                            summary (GET), campaign drill-down (POST)
///
/// /products/search                catalogue search (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/campaigns", campaigns::router())
        .nest("/calendar", calendar::router())
        .nest("/reviews", reviews::router())
        .nest("/approve", approve::router())
        .nest("/users", users::router())
        .nest("/kpi", kpi::router())
        .nest("/products", products::router())
}
