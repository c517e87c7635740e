//! # Combination Search
//!
//! One-shot query state for the budget search. There is no persistent
//! collection here: each search replaces the previous result.
//!
//! ```text
//!                 search(valid)            ok
//! NotSearched ─────────────────▶ Searching ─────▶ Found(combinations)
//!      │                           │
//!      │ search(invalid)           │ err
//!      └───────────────────────────┴────────────▶ Failed(message)
//! ```
//!
//! Any state may start a new search. `Found` with an empty list means the
//! backend had nothing under the budget, which is not a failure.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

use crate::api::{Combination, ProductStore};
use crate::core::messages;
use crate::core::resource::Generation;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    NotSearched,
    Searching { budget: f64 },
    Found { budget: f64, combinations: Vec<Combination> },
    Failed(String),
}

impl SearchState {
    pub fn is_searching(&self) -> bool {
        matches!(self, SearchState::Searching { .. })
    }
}

struct Inner {
    store: Arc<dyn ProductStore>,
    state: watch::Sender<SearchState>,
    generation: Generation,
}

#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

/// Parses a budget typed by the user. Must be a finite number above zero.
pub fn parse_budget(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|budget| budget.is_finite() && *budget > 0.0)
}

impl SearchController {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        let (state, _) = watch::channel(SearchState::NotSearched);
        Self {
            inner: Arc::new(Inner {
                store,
                state,
                generation: Generation::default(),
            }),
        }
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Ignores any search still in flight.
    pub fn retire(&self) {
        self.inner.generation.retire();
    }

    pub async fn search(&self, budget_input: &str) -> SearchState {
        let token = self.inner.generation.next();

        let Some(budget) = parse_budget(budget_input) else {
            info!("Rejected combination budget {budget_input:?}");
            self.apply(token, SearchState::Failed(messages::INVALID_BUDGET.to_string()));
            return self.state();
        };

        self.apply(token, SearchState::Searching { budget });

        let next = match self.inner.store.search_combinations(budget).await {
            Ok(combinations) => {
                info!("Found {} combinations for budget {budget}", combinations.len());
                SearchState::Found {
                    budget,
                    combinations,
                }
            }
            Err(e) => {
                warn!("Error fetching combinations: {e}");
                SearchState::Failed(messages::LOAD_COMBINATIONS.to_string())
            }
        };

        self.apply(token, next);
        self.state()
    }

    fn apply(&self, token: u64, next: SearchState) {
        self.inner.state.send_if_modified(|state| {
            if !self.inner.generation.is_current(token) {
                return false;
            }
            *state = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StoreError;
    use crate::test_support::FakeStore;

    fn combo(names: &[&str], total: f64) -> Combination {
        Combination {
            products: names.iter().map(|n| n.to_string()).collect(),
            total,
        }
    }

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget(" 1500.5 "), Some(1500.5));
        assert_eq!(parse_budget("0"), None);
        assert_eq!(parse_budget("-10"), None);
        assert_eq!(parse_budget("ten"), None);
        assert_eq!(parse_budget(""), None);
        assert_eq!(parse_budget("inf"), None);
    }

    #[tokio::test]
    async fn test_invalid_budget_issues_no_request() {
        let store = Arc::new(FakeStore::new());
        let controller = SearchController::new(store.clone());
        assert_eq!(controller.state(), SearchState::NotSearched);

        for input in ["0", "-5", "abc"] {
            let state = controller.search(input).await;
            assert_eq!(state, SearchState::Failed(messages::INVALID_BUDGET.to_string()));
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_found_not_failed() {
        let store = Arc::new(FakeStore::new());
        let controller = SearchController::new(store);

        let state = controller.search("100").await;
        assert_eq!(
            state,
            SearchState::Found {
                budget: 100.0,
                combinations: vec![]
            }
        );
    }

    #[tokio::test]
    async fn test_found_then_failed_then_found_again() {
        let store = Arc::new(FakeStore::new());
        store.set_combinations(vec![combo(&["A", "B"], 90.0)]);
        let controller = SearchController::new(store.clone());

        let state = controller.search("100").await;
        assert!(matches!(state, SearchState::Found { ref combinations, .. } if combinations.len() == 1));

        store.fail("search", StoreError::Network("timed out".into()));
        let state = controller.search("100").await;
        assert_eq!(state, SearchState::Failed(messages::LOAD_COMBINATIONS.to_string()));

        store.clear_failure("search");
        let state = controller.search("50").await;
        assert!(matches!(state, SearchState::Found { budget, .. } if budget == 50.0));
    }

    #[tokio::test]
    async fn test_subscribers_observe_searching() {
        let store = Arc::new(FakeStore::new());
        let controller = SearchController::new(store);
        let mut rx = controller.subscribe();

        let runner = controller.clone();
        let search = tokio::spawn(async move { runner.search("10").await });

        rx.changed().await.unwrap();
        let first = rx.borrow_and_update().clone();
        assert!(first.is_searching() || matches!(first, SearchState::Found { .. }));

        search.await.unwrap();
        assert!(matches!(controller.state(), SearchState::Found { .. }));
    }
}
