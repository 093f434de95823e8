use axum::extract::{Query, State};
use axum::Json;
use regatta_core::products::ProductSearchResult;
use regatta_workflow::products::search_products;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::SearchParams;
use crate::state::AppState;

/// GET /api/v1/products/search?keyword=
///
/// Catalogue products and term-sale bundles for the campaign editor's
/// product picker. Keywords under two characters return an empty result.
pub async fn search(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ProductSearchResult>> {
    let result = search_products(state.workflow.as_ref(), &params.keyword).await?;
    Ok(Json(result))
}
