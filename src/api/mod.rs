pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::{HttpProductStore, StoreConfig};
pub use error::{FieldErrors, StoreError};
pub use store::ProductStore;
pub use types::{Combination, InventorySummary, Product, ProductId, ProductInput};
