//! Product payloads attached to campaigns and the reshaping of raw product
//! search results into the catalogue shape the planner shows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Keywords shorter than this (after trimming) are not searched.
pub const MIN_SEARCH_KEYWORD_LEN: usize = 2;

/// Cap on products returned from a single search.
pub const MAX_SEARCH_PRODUCTS: usize = 20;

/* --------------------------------------------------------------------------
Campaign payloads
-------------------------------------------------------------------------- */

/// A featured product stored on a campaign. Opaque to the planner beyond
/// its SKU, which feeds content generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// A term-sale bundle selected as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSaleBundle {
    #[serde(alias = "term_sale_id")]
    pub term_sale_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
    #[serde(default)]
    pub products: Vec<Value>,
}

/// Parse a `products` JSON array. `null` is treated as absent.
pub fn parse_products(value: &Value) -> Result<Vec<ProductRef>, CoreError> {
    parse_list(value, "products")
}

/// Parse a `termSales` JSON array. `null` is treated as absent.
pub fn parse_term_sales(value: &Value) -> Result<Vec<TermSaleBundle>, CoreError> {
    parse_list(value, "termSales")
}

fn parse_list<T: serde::de::DeserializeOwned>(value: &Value, field: &str) -> Result<Vec<T>, CoreError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| CoreError::Validation(format!("{field} is malformed: {e}")))
}

/// SKUs handed to content generation, in selection order. Empty SKUs are skipped.
pub fn generation_skus(products: &[ProductRef]) -> Vec<String> {
    products
        .iter()
        .filter(|p| !p.sku.trim().is_empty())
        .map(|p| p.sku.clone())
        .collect()
}

/* --------------------------------------------------------------------------
Search results
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: Value,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSaleItem {
    pub part_code: Value,
    pub name: Value,
    pub brand: Value,
    pub original_price: f64,
    pub discount_price: f64,
    pub final_price: f64,
    pub start_date: Value,
    pub end_date: Value,
    pub pos_ecomm: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSale {
    pub term_sale_id: Value,
    pub products: Vec<TermSaleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResult {
    pub products: Vec<CatalogProduct>,
    pub term_sales: Vec<TermSale>,
    pub products_count: usize,
    pub term_sales_count: usize,
    pub keyword: String,
}

impl ProductSearchResult {
    pub fn empty(keyword: &str) -> Self {
        Self {
            products: Vec::new(),
            term_sales: Vec::new(),
            products_count: 0,
            term_sales_count: 0,
            keyword: keyword.to_string(),
        }
    }
}

/// Whether a keyword is long enough to be worth a search call.
pub fn is_searchable(keyword: &str) -> bool {
    keyword.trim().chars().count() >= MIN_SEARCH_KEYWORD_LEN
}

/// Reshape the search workflow's result object.
///
/// Missing ids fall back to the list position, names fall back to `title`,
/// prices are parsed from numbers or numeric strings and default to 0.
pub fn reshape_search_result(keyword: &str, raw: &Value) -> ProductSearchResult {
    let products: Vec<CatalogProduct> = array_at(raw, "products")
        .iter()
        .take(MAX_SEARCH_PRODUCTS)
        .enumerate()
        .map(|(index, item)| CatalogProduct {
            id: match item.get("id") {
                Some(id) if truthy(id) => id.clone(),
                _ => Value::from(index),
            },
            sku: str_at(item, "sku"),
            name: item
                .get("name")
                .filter(|v| truthy(v))
                .or_else(|| item.get("title"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            price: number(item.get("price")),
            is_visible: item
                .get("is_visible")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        })
        .collect();

    let term_sales: Vec<TermSale> = array_at(raw, "term_sales")
        .iter()
        .map(|sale| TermSale {
            term_sale_id: field(sale, "term_sale_id"),
            products: array_at(sale, "products")
                .iter()
                .map(|p| TermSaleItem {
                    part_code: field(p, "part_code"),
                    name: field(p, "name"),
                    brand: field(p, "brand"),
                    original_price: number(p.get("original_price")),
                    discount_price: number(p.get("discount_price")),
                    final_price: number(p.get("final_price")),
                    start_date: field(p, "start_date"),
                    end_date: field(p, "end_date"),
                    pos_ecomm: field(p, "pos_ecomm"),
                })
                .collect(),
        })
        .collect();

    ProductSearchResult {
        products_count: products.len(),
        term_sales_count: term_sales.len(),
        products,
        term_sales,
        keyword: keyword.to_string(),
    }
}

fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn str_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_keywords_are_not_searchable() {
        assert!(!is_searchable(""));
        assert!(!is_searchable(" m "));
        assert!(is_searchable("bc"));
    }

    #[test]
    fn product_fallbacks() {
        let raw = json!({
            "products": [
                {"sku": "FIN-1", "title": "Split Fin", "price": "89.95"},
                {"id": 77, "sku": "MASK-2", "name": "Mask", "price": 40, "is_visible": false}
            ]
        });
        let result = reshape_search_result("fin", &raw);
        assert_eq!(result.products_count, 2);
        assert_eq!(result.products[0].id, json!(0));
        assert_eq!(result.products[0].name, "Split Fin");
        assert_eq!(result.products[0].price, 89.95);
        assert!(result.products[0].is_visible);
        assert_eq!(result.products[1].id, json!(77));
        assert!(!result.products[1].is_visible);
    }

    #[test]
    fn unparseable_price_is_zero() {
        let raw = json!({"products": [{"sku": "X", "name": "X", "price": "call us"}]});
        assert_eq!(reshape_search_result("xx", &raw).products[0].price, 0.0);
    }

    #[test]
    fn products_capped_at_twenty() {
        let items: Vec<Value> = (0..30).map(|i| json!({"id": i + 1, "sku": format!("S{i}")})).collect();
        let result = reshape_search_result("s1", &json!({ "products": items }));
        assert_eq!(result.products.len(), MAX_SEARCH_PRODUCTS);
        assert_eq!(result.products_count, MAX_SEARCH_PRODUCTS);
    }

    #[test]
    fn term_sales_use_camel_case_keys() {
        let raw = json!({
            "term_sales": [{
                "term_sale_id": "SPRING",
                "products": [{"part_code": "P1", "name": "Reg", "brand": "Acme", "final_price": 10.5}]
            }]
        });
        let result = reshape_search_result("reg", &raw);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["termSalesCount"], json!(1));
        let item = &json["termSales"][0]["products"][0];
        assert_eq!(item["partCode"], json!("P1"));
        assert_eq!(item["finalPrice"], json!(10.5));
        assert_eq!(item["originalPrice"], json!(0.0));
    }

    #[test]
    fn missing_result_is_empty() {
        assert_eq!(reshape_search_result("bcd", &Value::Null), ProductSearchResult::empty("bcd"));
    }

    #[test]
    fn term_sale_bundle_accepts_snake_case_id() {
        let bundles = parse_term_sales(&json!([{"term_sale_id": "T1", "productCount": 3, "products": [{}]}])).unwrap();
        assert_eq!(bundles[0].term_sale_id, "T1");
        assert_eq!(bundles[0].product_count, Some(3));
    }

    #[test]
    fn products_parse_and_feed_skus() {
        let products = parse_products(&json!([
            {"id": 1, "sku": "A-1", "name": "A", "price": 1.5},
            {"sku": " ", "name": "blank"}
        ]))
        .unwrap();
        assert_eq!(generation_skus(&products), vec!["A-1".to_string()]);
        assert!(parse_products(&json!({"sku": "x"})).is_err());
        assert!(parse_products(&Value::Null).unwrap().is_empty());
    }
}
