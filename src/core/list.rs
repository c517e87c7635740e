//! # Product List Controller
//!
//! Owns the authoritative in-memory product collection.
//!
//! ```text
//!            refresh()                 list ok
//!   Idle ───────────────▶ Loading ───────────────▶ Ready(products)
//!                            │ ▲                        │
//!                   list err │ └──── refresh() ─────────┘
//!                            ▼
//!                      Failed(message)
//! ```
//!
//! Every successful create, update or delete is followed by a full refetch;
//! the collection is always replaced, never patched locally. Failed mutations
//! leave the current state untouched.
//!
//! An attached controller also invalidates its signal after a mutation so
//! sibling views (the inventory summary) reload. Its own refresher skips the
//! invalidation it published, since the mutation already refetched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::api::{Product, ProductId, ProductStore, StoreError};
use crate::core::draft::ProductDraft;
use crate::core::messages;
use crate::core::outcome::OperationOutcome;
use crate::core::resource::{Resource, ResourceCell};
use crate::core::signal::{RefreshSignal, spawn_refresher};
use crate::core::sort::{SortState, sorted};

pub type ListState = Resource<Vec<Product>>;

/// `covered` value meaning no invalidation has been covered yet.
const NOTHING_COVERED: u64 = u64::MAX;

struct Inner {
    store: Arc<dyn ProductStore>,
    cell: ResourceCell<Vec<Product>>,
    attachment: Mutex<Option<Attachment>>,
    /// Signal value already satisfied by a mutation's own refetch.
    covered: AtomicU64,
}

struct Attachment {
    signal: RefreshSignal,
    refresher: AbortHandle,
}

/// Cheap to clone; clones share the same collection.
#[derive(Clone)]
pub struct ListController {
    inner: Arc<Inner>,
}

impl ListController {
    /// Creates an idle controller. Nothing is fetched until [`refresh`] is
    /// called or the controller is attached to a signal.
    ///
    /// [`refresh`]: ListController::refresh
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                cell: ResourceCell::new(),
                attachment: Mutex::new(None),
                covered: AtomicU64::new(NOTHING_COVERED),
            }),
        }
    }

    /// Creates a controller that fetches immediately and again on every
    /// invalidation of `signal`.
    pub fn attached(store: Arc<dyn ProductStore>, signal: &RefreshSignal) -> Self {
        let controller = Self::new(store);
        controller.attach(signal);
        controller
    }

    /// Starts following `signal`, replacing any previous attachment.
    pub fn attach(&self, signal: &RefreshSignal) {
        // Loading is visible before the spawned task gets to run.
        let _ = self.inner.cell.begin();
        self.inner.covered.store(NOTHING_COVERED, Ordering::SeqCst);
        let controller = self.clone();
        let refresher = spawn_refresher(signal, move |seen| {
            let controller = controller.clone();
            async move {
                if controller.inner.covered.load(Ordering::SeqCst) == seen {
                    debug!("Skipping refetch for invalidation {seen}, already resynced");
                    return;
                }
                controller.refresh().await;
            }
        });
        let attachment = Attachment {
            signal: signal.clone(),
            refresher,
        };
        if let Some(previous) = self.lock_attachment().replace(attachment) {
            previous.refresher.abort();
        }
    }

    /// Stops following any signal and drops every in-flight response.
    pub fn retire(&self) {
        self.inner.cell.retire();
        if let Some(attachment) = self.lock_attachment().take() {
            attachment.refresher.abort();
        }
    }

    pub fn state(&self) -> ListState {
        self.inner.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.inner.cell.subscribe()
    }

    /// The current collection, if loaded.
    pub fn products(&self) -> Option<Vec<Product>> {
        match self.state() {
            Resource::Ready(products) => Some(products),
            _ => None,
        }
    }

    /// The current collection ordered by `sort`; empty unless loaded.
    pub fn sorted(&self, sort: &SortState) -> Vec<Product> {
        self.products()
            .map(|products| sorted(&products, sort))
            .unwrap_or_default()
    }

    /// Refetches the whole collection.
    pub async fn refresh(&self) {
        let Some(token) = self.inner.cell.begin() else {
            return;
        };

        let next = match self.inner.store.list_products().await {
            Ok(products) => {
                info!("Loaded {} products from {}", products.len(), self.inner.store.name());
                Resource::Ready(products)
            }
            Err(e) => {
                warn!("Error fetching products: {e}");
                Resource::Failed(messages::LOAD_PRODUCTS.to_string())
            }
        };

        if !self.inner.cell.settle(token, next) {
            info!("Discarded stale product list response (request {token})");
        }
    }

    pub async fn create(&self, draft: &ProductDraft) -> OperationOutcome<Product> {
        let input = match draft.validate() {
            Ok(input) => input,
            Err(fields) => return OperationOutcome::invalid(messages::INVALID_INPUT, fields),
        };

        match self.inner.store.create_product(&input).await {
            Ok(product) => {
                info!("Created product {} ({})", product.id, product.name);
                self.resync().await;
                OperationOutcome::Success(product)
            }
            Err(e) => {
                warn!("Error creating product: {e}");
                save_failure(e)
            }
        }
    }

    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> OperationOutcome<Product> {
        let input = match draft.validate() {
            Ok(input) => input,
            Err(fields) => return OperationOutcome::invalid(messages::INVALID_INPUT, fields),
        };

        match self.inner.store.update_product(id, &input).await {
            Ok(product) => {
                info!("Updated product {id}");
                self.resync().await;
                OperationOutcome::Success(product)
            }
            Err(e) => {
                warn!("Error updating product {id}: {e}");
                save_failure(e)
            }
        }
    }

    /// Deletes a product. Callers are expected to have confirmed intent.
    pub async fn delete(&self, id: ProductId) -> OperationOutcome {
        match self.inner.store.delete_product(id).await {
            Ok(()) => {
                info!("Deleted product {id}");
                self.resync().await;
                OperationOutcome::Success(())
            }
            Err(e) => {
                warn!("Error deleting product {id}: {e}");
                OperationOutcome::failure(messages::DELETE_PRODUCT)
            }
        }
    }

    /// Refetches after a successful mutation and, when attached, tells the
    /// other views on the signal to reload.
    ///
    /// The published invalidation counts as covered only when no other one
    /// arrived while the refetch was running; otherwise the refresher must
    /// still run, as the refetch may predate it.
    async fn resync(&self) {
        let signal = self.lock_attachment().as_ref().map(|a| a.signal.clone());
        let Some(signal) = signal else {
            self.refresh().await;
            return;
        };

        let before = signal.invalidations();
        self.refresh().await;
        let covered = &self.inner.covered;
        let seq = signal.invalidate_with(|seq| {
            if seq == before + 1 {
                covered.store(seq, Ordering::SeqCst);
            }
        });
        info!("Catalog changed, invalidated views (signal {seq})");
    }

    fn lock_attachment(&self) -> std::sync::MutexGuard<'_, Option<Attachment>> {
        self.inner
            .attachment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Validation detail and backend-authored messages are surfaced; transport
/// failures collapse to the generic save message.
fn save_failure(err: StoreError) -> OperationOutcome<Product> {
    match err {
        StoreError::Validation { message, fields } => OperationOutcome::invalid(message, fields),
        StoreError::Server {
            message: Some(message),
            ..
        } => OperationOutcome::failure(message),
        _ => OperationOutcome::failure(messages::SAVE_PRODUCT),
    }
}
