//! Product and term-sale search.

use regatta_core::products::{is_searchable, reshape_search_result, ProductSearchResult};
use serde_json::{Map, Value};

use crate::error::WorkflowError;
use crate::executor::{WorkflowExecutor, WorkflowKind};

/// Search the catalogue. Keywords too short to search return an empty
/// result without calling the workflow.
pub async fn search_products(
    executor: &dyn WorkflowExecutor,
    keyword: &str,
) -> Result<ProductSearchResult, WorkflowError> {
    let keyword = keyword.trim();
    if !is_searchable(keyword) {
        return Ok(ProductSearchResult::empty(keyword));
    }

    let mut vars = Map::new();
    vars.insert("keyword".into(), Value::from(keyword));
    let raw = executor.execute(WorkflowKind::ProductSearch, vars).await?;

    let result = reshape_search_result(keyword, &raw);
    tracing::debug!(
        keyword,
        products = result.products_count,
        term_sales = result.term_sales_count,
        "Product search completed",
    );
    Ok(result)
}
