//! Product source trait

use async_trait::async_trait;
use nutriguard_core::{Product, Result};

/// Anything that can look up food products
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Look up one product by barcode. `Ok(None)` means not found.
    async fn fetch_by_code(&self, code: &str) -> Result<Option<Product>>;

    /// Free-text search by product name
    async fn search_by_name(&self, query: &str) -> Result<Vec<Product>>;

    /// Most popular products in a category
    async fn browse_category(&self, category: &str) -> Result<Vec<Product>>;

    /// Most popular products overall
    async fn trending(&self) -> Result<Vec<Product>>;

    /// Get the source name
    fn name(&self) -> &str;
}
