//! Open Food Facts product source
//!
//! Barcode lookup:
//! ```text
//! GET {base}/api/v0/product/{code}.json
//! {"code": "3017620422003", "status": 1, "product": {...}}
//! ```
//!
//! Name search:
//! ```text
//! GET {base}/cgi/search.pl?search_terms=...&search_simple=1&action=process&json=1
//! {"count": 2, "products": [{...}, {...}]}
//! ```
//!
//! Category browsing and trending reuse the search endpoint sorted by
//! popularity:
//! ```text
//! GET {base}/cgi/search.pl?tagtype_0=categories&tag_contains_0=contains&tag_0={id}&sort_by=popularity&page_size=20&json=1&fields=...
//! GET {base}/cgi/search.pl?sort_by=popularity&page_size=10&json=1&fields=...
//! ```
//! Listing results without a barcode, name or image are dropped.

use crate::source::ProductSource;
use async_trait::async_trait;
use nutriguard_core::{Product, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public Open Food Facts instance
pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Products returned per category page
pub const CATEGORY_PAGE_SIZE: u32 = 20;

/// Products returned by the trending listing
pub const TRENDING_PAGE_SIZE: u32 = 10;

/// Fields requested for listings; everything the screener reads
const LISTING_FIELDS: &str = "code,product_name,brands,ingredients_text,nutriments,\
nutrition_grades,categories_tags,alcohol_by_volume,image_url,image_front_url";

/// HTTP settings for the client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the database
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("nutriguard/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Open Food Facts HTTP client
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl OpenFoodFactsClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            nutriguard_core::Error::config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| nutriguard_core::Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// URL of the barcode lookup endpoint
    pub fn product_url(&self, code: &str) -> Result<Url> {
        let file = format!("{}.json", code);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| nutriguard_core::Error::config("Base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["api", "v0", "product", file.as_str()]);
        Ok(url)
    }

    fn search_endpoint(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| nutriguard_core::Error::config("Base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["cgi", "search.pl"]);
        Ok(url)
    }

    /// URL of the name search endpoint
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self.search_endpoint()?;
        url.query_pairs_mut()
            .append_pair("search_terms", query)
            .append_pair("search_simple", "1")
            .append_pair("action", "process")
            .append_pair("json", "1");
        Ok(url)
    }

    /// URL of the popularity-sorted listing for one category
    pub fn category_url(&self, category: &str) -> Result<Url> {
        let mut url = self.search_endpoint()?;
        url.query_pairs_mut()
            .append_pair("tagtype_0", "categories")
            .append_pair("tag_contains_0", "contains")
            .append_pair("tag_0", category)
            .append_pair("sort_by", "popularity")
            .append_pair("page_size", &CATEGORY_PAGE_SIZE.to_string())
            .append_pair("json", "1")
            .append_pair("fields", LISTING_FIELDS);
        Ok(url)
    }

    /// URL of the popularity-sorted listing across all products
    pub fn trending_url(&self) -> Result<Url> {
        let mut url = self.search_endpoint()?;
        url.query_pairs_mut()
            .append_pair("sort_by", "popularity")
            .append_pair("page_size", &TRENDING_PAGE_SIZE.to_string())
            .append_pair("json", "1")
            .append_pair("fields", LISTING_FIELDS);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Option<Value>> {
        debug!(%url, "requesting");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| nutriguard_core::Error::source(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(nutriguard_core::Error::source(format!(
                "Product database returned {}",
                status
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| nutriguard_core::Error::source(format!("Invalid response body: {}", e)))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl ProductSource for OpenFoodFactsClient {
    async fn fetch_by_code(&self, code: &str) -> Result<Option<Product>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        match self.get_json(self.product_url(code)?).await? {
            Some(body) => parse_product_response(body, code),
            None => Ok(None),
        }
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        match self.get_json(self.search_url(query)?).await? {
            Some(body) => Ok(parse_search_response(body)),
            None => Ok(Vec::new()),
        }
    }

    async fn browse_category(&self, category: &str) -> Result<Vec<Product>> {
        let category = category.trim();
        if category.is_empty() {
            return Ok(Vec::new());
        }

        match self.get_json(self.category_url(category)?).await? {
            Some(body) => Ok(parse_listing_response(body)),
            None => Ok(Vec::new()),
        }
    }

    async fn trending(&self) -> Result<Vec<Product>> {
        match self.get_json(self.trending_url()?).await? {
            Some(body) => Ok(parse_listing_response(body)),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "openfoodfacts"
    }
}

/// Extract the product from a barcode lookup response
///
/// A missing `product` object or `status: 0` means not found. The
/// requested code fills in when the product object omits its own.
pub fn parse_product_response(body: Value, requested_code: &str) -> Result<Option<Product>> {
    let Value::Object(mut body) = body else {
        return Err(nutriguard_core::Error::source("Product response is not an object"));
    };

    if body.get("status").and_then(Value::as_i64) == Some(0) {
        return Ok(None);
    }

    let Some(Value::Object(mut product)) = body.remove("product") else {
        return Ok(None);
    };

    if !product.contains_key("code") {
        let code = body
            .remove("code")
            .unwrap_or_else(|| Value::String(requested_code.to_string()));
        product.insert("code".to_string(), code);
    }

    Ok(Some(serde_json::from_value(Value::Object(product))?))
}

/// Extract products from a search response, dropping unusable entries
pub fn parse_search_response(body: Value) -> Vec<Product> {
    let Some(Value::Array(items)) = body.get("products").cloned() else {
        return Vec::new();
    };

    let total = items.len();
    let products: Vec<Product> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if products.len() < total {
        warn!(
            skipped = total - products.len(),
            "Dropped search results without a usable barcode"
        );
    }

    products
}

/// Extract products from a listing response, keeping only entries with
/// a barcode, a name and an image
pub fn parse_listing_response(body: Value) -> Vec<Product> {
    parse_search_response(body)
        .into_iter()
        .filter(|p| !p.code.is_empty() && p.name().is_some())
        .filter(|p| p.image_url.as_deref().is_some_and(|url| !url.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> OpenFoodFactsClient {
        OpenFoodFactsClient::new(&ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_product_url() {
        let url = client(DEFAULT_BASE_URL).product_url("3017620422003").unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );

        let url = client("http://localhost:8080/off/").product_url("42").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/off/api/v0/product/42.json");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client(DEFAULT_BASE_URL).search_url("peanut butter & jam").unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/cgi/search.pl?search_terms=peanut+butter+%26+jam&search_simple=1&action=process&json=1"
        );
    }

    #[test]
    fn test_category_url() {
        let url = client(DEFAULT_BASE_URL).category_url("breakfast-cereals").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/cgi/search.pl");
        assert!(pairs.contains(&("tagtype_0".into(), "categories".into())));
        assert!(pairs.contains(&("tag_contains_0".into(), "contains".into())));
        assert!(pairs.contains(&("tag_0".into(), "breakfast-cereals".into())));
        assert!(pairs.contains(&("sort_by".into(), "popularity".into())));
        assert!(pairs.contains(&("page_size".into(), "20".into())));

        let fields = pairs.iter().find(|(k, _)| k == "fields").map(|(_, v)| v.as_str());
        assert!(fields.is_some_and(|f| f.contains("ingredients_text") && f.contains("image_url")));
    }

    #[test]
    fn test_trending_url() {
        let url = client(DEFAULT_BASE_URL).trending_url().unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("sort_by".into(), "popularity".into())));
        assert!(pairs.contains(&("page_size".into(), "10".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "tag_0"));
    }

    #[test]
    fn test_parse_listing_drops_incomplete_products() {
        let body = json!({
            "products": [
                {"code": "1", "product_name": "Apple", "image_url": "https://img/1.jpg"},
                {"code": "2", "product_name": "No image"},
                {"code": "3", "image_url": "https://img/3.jpg"},
                {"code": "4", "product_name": "", "image_url": "https://img/4.jpg"},
                {"code": "", "product_name": "No code", "image_url": "https://img/5.jpg"},
                {"product_name": "Missing code", "image_url": "https://img/6.jpg"}
            ]
        });

        let products = parse_listing_response(body);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].code, "1");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OpenFoodFactsClient::new(&ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        });
        assert!(matches!(result, Err(nutriguard_core::Error::Config(_))));
    }

    #[test]
    fn test_parse_found_product() {
        let body = json!({
            "code": "3017620422003",
            "status": 1,
            "status_verbose": "product found",
            "product": {
                "code": "3017620422003",
                "product_name": "Nutella",
                "ingredients_text": "Sugar, palm oil, hazelnuts",
                "nutriments": {"sugars": 56.3, "sugars_unit": "g"},
                "nutrition_grades": "e"
            }
        });

        let product = parse_product_response(body, "3017620422003").unwrap().unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Nutella"));
        assert_eq!(product.nutrient("sugars"), Some(56.3));
    }

    #[test]
    fn test_parse_not_found() {
        let body = json!({"code": "0000", "status": 0, "status_verbose": "product not found"});
        assert_eq!(parse_product_response(body, "0000").unwrap(), None);

        let body = json!({"code": "0000"});
        assert_eq!(parse_product_response(body, "0000").unwrap(), None);
    }

    #[test]
    fn test_parse_product_without_code() {
        let body = json!({"status": 1, "product": {"product_name": "Water"}});
        let product = parse_product_response(body, "123").unwrap().unwrap();
        assert_eq!(product.code, "123");
    }

    #[test]
    fn test_parse_non_object_is_error() {
        assert!(parse_product_response(json!([1, 2]), "1").is_err());
    }

    #[test]
    fn test_parse_search_skips_bad_entries() {
        let body = json!({
            "count": 3,
            "products": [
                {"code": "1", "product_name": "Cola"},
                {"product_name": "No barcode"},
                {"code": "2", "categories_tags": ["en:beverages"]}
            ]
        });

        let products = parse_search_response(body);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].code, "1");
        assert_eq!(products[1].code, "2");
    }

    #[test]
    fn test_parse_search_without_products() {
        assert!(parse_search_response(json!({"count": 0})).is_empty());
        assert!(parse_search_response(json!({"products": null})).is_empty());
    }
}
