//! Memoized exploration session
//!
//! [`Explorer`] owns the raw result list together with the filter, selection
//! and sort state, and serves the derived views a UI renders. Derived values
//! are pure functions of their inputs, so they are cached under a 64-bit
//! fingerprint of those inputs and only recomputed when one changes:
//!
//! ```text
//! items ──┬──────────────────────────────▶ baseline statistics
//!         └─▶ filter + view mode ─▶ sort ─▶ view ─▶ filtered statistics
//! ```
//!
//! Appending a page keeps the shared prefix: tags of known ids come from the
//! tag index and only the new suffix goes through the filter.

mod fingerprint;
mod session;

pub use session::{Explorer, ExplorerBuilder};
