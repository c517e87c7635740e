use async_trait::async_trait;

use super::error::StoreError;
use super::types::{Combination, InventorySummary, Product, ProductId, ProductInput};

/// Typed access to the catalog backend. Implementations only shape requests
/// and map responses; they hold no state of their own.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns the name of the store, for logging.
    fn name(&self) -> &str;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Creates a product. The returned product carries the server-assigned id.
    async fn create_product(&self, input: &ProductInput) -> Result<Product, StoreError>;

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    async fn inventory_summary(&self) -> Result<InventorySummary, StoreError>;

    /// Asks the backend for combinations of 2 or 3 products whose price sum
    /// is at most `max_budget`. Only positivity of the budget is checked here.
    async fn search_combinations(&self, max_budget: f64) -> Result<Vec<Combination>, StoreError>;
}
