//! Multi-item selection
//!
//! Selection is tracked by item id, so it survives re-filtering and sorting.
//! Range operations always run against the view list the user is looking
//! at, never the raw result list.

pub mod state;

pub use state::{SelectionState, ViewMode};
