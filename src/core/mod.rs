//! # Core Application Logic
//!
//! Controllers and the sort engine. Nothing here knows how results are
//! displayed; the CLI is one consumer among many.
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │          CORE           │
//!                     │                         │
//!                     │  • ListController       │
//!                     │  • SummaryController    │
//!                     │  • SearchController     │
//!                     │  • sort engine          │
//!                     └───────────┬─────────────┘
//!                                 │ ProductStore
//!                                 ▼
//!                     ┌─────────────────────────┐
//!                     │   api (HTTP / fakes)    │
//!                     └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the `App` struct wiring controllers to one store and signal
//! - [`list`], [`summary`], [`search`]: the controllers
//! - [`sort`]: typed, stable, multi-type ordering
//! - [`draft`], [`editor`]: raw input, validation, and form state

pub mod config;
pub mod draft;
pub mod editor;
pub mod list;
pub mod messages;
pub mod outcome;
pub mod resource;
pub mod search;
pub mod signal;
pub mod sort;
pub mod state;
pub mod summary;

pub use outcome::OperationOutcome;
pub use resource::Resource;
pub use state::App;
