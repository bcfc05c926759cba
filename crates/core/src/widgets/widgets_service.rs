use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, error, info, warn};
use serde_json::Value;
use uuid::Uuid;

use super::widgets_model::{
    move_item, widgets_from_value, DashboardExport, DashboardState, NewWidget, Widget,
    EXPORT_VERSION,
};
use super::widgets_traits::{DashboardRepositoryTrait, DashboardServiceTrait};
use crate::errors::Result;

/// Owns the widget collection.
///
/// The in-memory state is authoritative. Every mutation is written through
/// the repository while the write lock is held, so saves happen in mutation
/// order. A failed save is returned to the caller but the mutation stands.
pub struct DashboardService {
    repository: Arc<dyn DashboardRepositoryTrait>,
    state: RwLock<DashboardState>,
}

impl DashboardService {
    /// Rehydrate from `repository`. A missing or unreadable record starts an
    /// empty dashboard.
    pub fn new(repository: Arc<dyn DashboardRepositoryTrait>) -> Self {
        let state = match repository.load() {
            Ok(Some(state)) => {
                info!("Loaded dashboard with {} widgets", state.widgets.len());
                state
            }
            Ok(None) => {
                debug!("No stored dashboard, starting empty");
                DashboardState::default()
            }
            Err(e) => {
                warn!("Failed to load dashboard, starting empty: {}", e);
                DashboardState::default()
            }
        };

        DashboardService {
            repository,
            state: RwLock::new(state),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Dashboard state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Dashboard state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn persist(&self, state: &DashboardState) -> Result<()> {
        self.repository.save(state).map_err(|e| {
            error!("Failed to persist dashboard: {}", e);
            e
        })
    }

    fn next_id(state: &DashboardState) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !state.widgets.iter().any(|w| w.id == id) {
                return id;
            }
        }
    }
}

impl DashboardServiceTrait for DashboardService {
    fn get_widgets(&self) -> Vec<Widget> {
        self.read_state().widgets.clone()
    }

    fn get_widget(&self, widget_id: &str) -> Option<Widget> {
        self.read_state()
            .widgets
            .iter()
            .find(|w| w.id == widget_id)
            .cloned()
    }

    fn add_widget(&self, new_widget: NewWidget) -> Result<Widget> {
        let mut state = self.write_state();
        let widget = new_widget.into_widget(Self::next_id(&state));
        debug!("Adding {:?} widget {}", widget.widget_type(), widget.id);

        state.widgets.push(widget.clone());
        self.persist(&state)?;
        Ok(widget)
    }

    fn remove_widget(&self, widget_id: &str) -> Result<()> {
        let mut state = self.write_state();
        let before = state.widgets.len();
        state.widgets.retain(|w| w.id != widget_id);

        if state.widgets.len() == before {
            debug!("Remove of unknown widget {} ignored", widget_id);
            return Ok(());
        }
        self.persist(&state)
    }

    fn reorder(&self, from: usize, to: usize) -> Result<()> {
        let mut state = self.write_state();
        if !move_item(&mut state.widgets, from, to) {
            debug!("Reorder {} -> {} ignored", from, to);
            return Ok(());
        }
        self.persist(&state)
    }

    fn export_config(&self) -> DashboardExport {
        DashboardExport {
            version: EXPORT_VERSION,
            widgets: self.get_widgets(),
        }
    }

    fn import_config(&self, payload: &Value) -> Result<()> {
        let widgets = match payload.get("widgets") {
            Some(value) => widgets_from_value(value),
            None => {
                warn!("Import payload has no widgets, clearing dashboard");
                Vec::new()
            }
        };

        match payload.get("version").and_then(Value::as_u64) {
            Some(version) if version != u64::from(EXPORT_VERSION) => {
                warn!("Importing dashboard export version {}", version)
            }
            _ => {}
        }

        let mut state = self.write_state();
        info!("Importing {} widgets", widgets.len());
        state.widgets = widgets;
        self.persist(&state)
    }

    fn has_seen_tour(&self) -> bool {
        self.read_state().has_seen_tour
    }

    fn set_has_seen_tour(&self, seen: bool) -> Result<()> {
        let mut state = self.write_state();
        if state.has_seen_tour == seen {
            return Ok(());
        }
        state.has_seen_tour = seen;
        self.persist(&state)
    }
}
