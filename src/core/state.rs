//! # Application State
//!
//! Wires the controllers to one store and one refresh signal.
//!
//! ```text
//! App
//! ├── store: Arc<dyn ProductStore>   // backend access
//! ├── signal: RefreshSignal          // "data changed" broadcast
//! ├── list: ListController           // product collection
//! ├── summary: SummaryController     // inventory aggregates
//! ├── search: SearchController       // budget combinations
//! └── sort: SortState                // active list ordering
//! ```
//!
//! Mutations go through the list controller. Once attached, the list
//! invalidates the signal after each successful one so the summary reloads.

use std::sync::Arc;

use crate::api::{Product, ProductId, ProductStore};
use crate::core::config::ResolvedConfig;
use crate::core::draft::ProductDraft;
use crate::core::list::ListController;
use crate::core::outcome::OperationOutcome;
use crate::core::search::SearchController;
use crate::core::signal::RefreshSignal;
use crate::core::sort::SortState;
use crate::core::summary::SummaryController;

pub struct App {
    pub store: Arc<dyn ProductStore>,
    pub signal: RefreshSignal,
    pub list: ListController,
    pub summary: SummaryController,
    pub search: SearchController,
    pub sort: SortState,
}

impl App {
    /// Controllers start idle; call [`load`](App::load) or
    /// [`attach`](App::attach) to fetch.
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            list: ListController::new(store.clone()),
            summary: SummaryController::new(store.clone()),
            search: SearchController::new(store.clone()),
            signal: RefreshSignal::new(),
            sort: SortState::default(),
            store,
        }
    }

    pub fn from_config(store: Arc<dyn ProductStore>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(store);
        app.sort = SortState::new(config.default_sort_key.clone());
        app
    }

    /// Makes list and summary follow the refresh signal (fetching now).
    pub fn attach(&self) {
        self.list.attach(&self.signal);
        self.summary.attach(&self.signal);
    }

    /// Loads list and summary once, concurrently.
    pub async fn load(&self) {
        futures::join!(self.list.refresh(), self.summary.refresh());
    }

    /// The product list in the current sort order.
    pub fn sorted_products(&self) -> Vec<Product> {
        self.list.sorted(&self.sort)
    }

    pub async fn create(&self, draft: &ProductDraft) -> OperationOutcome<Product> {
        self.list.create(draft).await
    }

    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> OperationOutcome<Product> {
        self.list.update(id, draft).await
    }

    pub async fn delete(&self, id: ProductId) -> OperationOutcome {
        self.list.delete(id).await
    }

    /// Stops every controller; late responses are dropped.
    pub fn shutdown(&self) {
        self.list.retire();
        self.summary.retire();
        self.search.retire();
    }
}
