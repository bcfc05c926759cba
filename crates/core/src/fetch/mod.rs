//! Fetch layer between widgets and the data gateway.
//!
//! - `dedupe` - request de-duplication with per-waiter cancellation
//! - `poller` - refresh timer for one widget

mod dedupe;
mod poller;

#[cfg(test)]
mod test_support;

pub use dedupe::{DedupingGateway, FetchResult, SharedFetch, DEFAULT_DEDUPE_WINDOW};
pub use poller::{spawn_widget_poller, PollHandle};
