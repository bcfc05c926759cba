use serde_json::Value;

use crate::errors::Result;
use crate::widgets::widgets_model::{DashboardExport, DashboardState, NewWidget, Widget};

/// Trait for dashboard persistence.
pub trait DashboardRepositoryTrait: Send + Sync {
    /// Load the stored dashboard. `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<DashboardState>>;
    /// Replace the stored dashboard with `state`.
    fn save(&self, state: &DashboardState) -> Result<()>;
}

/// Trait for dashboard service operations
pub trait DashboardServiceTrait: Send + Sync {
    fn get_widgets(&self) -> Vec<Widget>;
    fn get_widget(&self, widget_id: &str) -> Option<Widget>;
    fn add_widget(&self, new_widget: NewWidget) -> Result<Widget>;
    fn remove_widget(&self, widget_id: &str) -> Result<()>;
    fn reorder(&self, from: usize, to: usize) -> Result<()>;
    fn export_config(&self) -> DashboardExport;
    fn import_config(&self, payload: &Value) -> Result<()>;
    fn has_seen_tour(&self) -> bool;
    fn set_has_seen_tour(&self, seen: bool) -> Result<()>;
}
