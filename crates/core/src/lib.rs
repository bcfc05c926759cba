//! FinBoard Core - widget domain, dashboard service, and fetch layer.
//!
//! This crate owns the dashboard state and the rules around it. It is
//! storage-agnostic and defines the repository trait implemented by the
//! `storage-file` crate.

pub mod errors;
pub mod fetch;
pub mod widgets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
