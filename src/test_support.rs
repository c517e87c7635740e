//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{
    Combination, InventorySummary, Product, ProductId, ProductInput, ProductStore, StoreError,
};

/// In-memory store that records every call.
///
/// Failures can be injected per operation (`"list"`, `"get"`, `"create"`,
/// `"update"`, `"delete"`, `"summary"`, `"search"`) and stay in place until
/// cleared. `hold_next_list` parks the next `list_products` call on a gate
/// after it has taken its snapshot, which lets tests resolve requests out of
/// order.
pub struct FakeStore {
    products: Mutex<Vec<Product>>,
    next_id: AtomicI64,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, StoreError>>,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    combinations: Mutex<Vec<Combination>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            products: Mutex::new(products),
            next_id: AtomicI64::new(next_id),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            list_gate: Mutex::new(None),
            combinations: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(&self, op: &'static str, err: StoreError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    pub fn clear_failure(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    pub fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn set_combinations(&self, combinations: Vec<Combination>) {
        *self.combinations.lock().unwrap() = combinations;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    /// Makes the next `list_products` call wait until the returned sender
    /// fires (or is dropped).
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.lock().unwrap() = Some(rx);
        tx
    }

    fn record(&self, op: &'static str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn build(id: ProductId, input: &ProductInput) -> Product {
        Product {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            stock_quantity: input.stock_quantity,
        }
    }
}

#[async_trait]
impl ProductStore for FakeStore {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let result = self.record("list").map(|_| self.products());
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.record("get")?;
        self.products()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, StoreError> {
        self.record("create")?;
        let product = Self::build(self.next_id.fetch_add(1, Ordering::SeqCst), input);
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, StoreError> {
        self.record("update")?;
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        *slot = Self::build(id, input);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.record("delete")?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn inventory_summary(&self) -> Result<InventorySummary, StoreError> {
        self.record("summary")?;
        Ok(InventorySummary::from_products(&self.products()))
    }

    async fn search_combinations(&self, _max_budget: f64) -> Result<Vec<Combination>, StoreError> {
        self.record("search")?;
        Ok(self.combinations.lock().unwrap().clone())
    }
}

pub fn product(id: ProductId, name: &str, price: f64, stock_quantity: i32) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        price,
        stock_quantity,
    }
}

/// Waits until `op` has been called at least `count` times.
pub async fn wait_for_calls(store: &FakeStore, op: &str, count: usize) {
    while store.call_count(op) < count {
        tokio::task::yield_now().await;
    }
}
