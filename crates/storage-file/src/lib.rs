//! JSON file storage implementation for FinBoard.
//!
//! Implements the repository traits defined in `finboard-core` on top of a
//! single JSON document:
//!
//! ```text
//! { "version": 1, "state": { "widgets": [...], "hasSeenTour": false } }
//! ```

pub mod dashboard;
pub mod errors;

pub use dashboard::FileDashboardRepository;
pub use errors::StorageError;
