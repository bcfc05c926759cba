//! File storage implementation for the dashboard.

mod repository;

pub use repository::FileDashboardRepository;
