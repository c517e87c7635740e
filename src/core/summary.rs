//! Read-only inventory summary, refreshed on the same signal as the product
//! list. It has no mutations of its own.

use std::sync::{Arc, Mutex};

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::api::{InventorySummary, ProductStore};
use crate::core::messages;
use crate::core::resource::{Resource, ResourceCell};
use crate::core::signal::{RefreshSignal, spawn_refresher};

pub type SummaryState = Resource<InventorySummary>;

struct Inner {
    store: Arc<dyn ProductStore>,
    cell: ResourceCell<InventorySummary>,
    refresher: Mutex<Option<AbortHandle>>,
}

#[derive(Clone)]
pub struct SummaryController {
    inner: Arc<Inner>,
}

impl SummaryController {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                cell: ResourceCell::new(),
                refresher: Mutex::new(None),
            }),
        }
    }

    pub fn attached(store: Arc<dyn ProductStore>, signal: &RefreshSignal) -> Self {
        let controller = Self::new(store);
        controller.attach(signal);
        controller
    }

    pub fn attach(&self, signal: &RefreshSignal) {
        let _ = self.inner.cell.begin();
        let controller = self.clone();
        let handle = spawn_refresher(signal, move |_| {
            let controller = controller.clone();
            async move { controller.refresh().await }
        });
        let mut refresher = self
            .inner
            .refresher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = refresher.replace(handle) {
            previous.abort();
        }
    }

    pub fn retire(&self) {
        self.inner.cell.retire();
        let handle = self
            .inner
            .refresher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    pub fn state(&self) -> SummaryState {
        self.inner.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SummaryState> {
        self.inner.cell.subscribe()
    }

    pub async fn refresh(&self) {
        let Some(token) = self.inner.cell.begin() else {
            return;
        };

        let next = match self.inner.store.inventory_summary().await {
            Ok(summary) => {
                info!(
                    "Inventory summary: total value {}, top product {:?}",
                    summary.total_inventory_value,
                    summary.highest_value_product.as_ref().map(|p| p.id)
                );
                Resource::Ready(summary)
            }
            Err(e) => {
                warn!("Error fetching inventory summary: {e}");
                Resource::Failed(messages::LOAD_INVENTORY.to_string())
            }
        };

        self.inner.cell.settle(token, next);
    }
}
