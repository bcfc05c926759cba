use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use finboard_core::widgets::{DashboardRepositoryTrait, DashboardState};
use finboard_core::Result;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StorageError;

const CURRENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoredDashboard<'a> {
    version: u32,
    state: &'a DashboardState,
}

/// Dashboard repository backed by one pretty-printed JSON file.
#[derive(Debug)]
pub struct FileDashboardRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDashboardRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_locked(&self) -> std::result::Result<Option<DashboardState>, StorageError> {
        if !self.path.exists() {
            debug!("Dashboard file {} does not exist yet", self.path.display());
            return Ok(None);
        }

        let raw = fs::read(&self.path)?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Value = serde_json::from_slice(&raw)?;
        let state = value
            .get("state")
            .ok_or_else(|| StorageError::InvalidFormat("missing \"state\"".to_string()))?;
        if let Some(version) = value.get("version").and_then(Value::as_u64) {
            if version != u64::from(CURRENT_VERSION) {
                debug!("Reading dashboard file version {}", version);
            }
        }

        Ok(Some(DashboardState::from_value(state)))
    }

    fn save_locked(&self, state: &DashboardState) -> std::result::Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredDashboard {
            version: CURRENT_VERSION,
            state,
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl DashboardRepositoryTrait for FileDashboardRepository {
    fn load(&self) -> Result<Option<DashboardState>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.load_locked()?)
    }

    fn save(&self, state: &DashboardState) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.save_locked(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finboard_core::widgets::{
        CardMapping, DashboardService, DashboardServiceTrait, NewWidget, WidgetMapping,
    };
    use finboard_core::Error;
    use finboard_market_data::ProviderId;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn new_card(title: &str) -> NewWidget {
        NewWidget::new(
            ProviderId::Finnhub,
            "/quote",
            WidgetMapping::Card(CardMapping::default()),
        )
        .with_title(title)
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let repository = FileDashboardRepository::new(dir.path().join("dashboard.json"));
        assert!(repository.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.json");
        let repository = Arc::new(FileDashboardRepository::new(&path));

        let service = DashboardService::new(repository.clone());
        let widget = service.add_widget(new_card("AAPL")).unwrap();
        service.set_has_seen_tour(true).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["state"]["hasSeenTour"], true);
        assert_eq!(raw["state"]["widgets"][0]["title"], "AAPL");

        let reloaded = DashboardService::new(repository);
        assert_eq!(reloaded.get_widgets(), vec![widget]);
        assert!(reloaded.has_seen_tour());
    }

    #[test]
    fn test_corrupt_file_is_an_error_and_service_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "{ not json").unwrap();

        let repository = Arc::new(FileDashboardRepository::new(&path));
        assert!(matches!(repository.load(), Err(Error::Serialization(_))));

        let service = DashboardService::new(repository);
        assert!(service.get_widgets().is_empty());
    }

    #[test]
    fn test_unexpected_layout_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{ "widgets": [] }"#).unwrap();

        let repository = FileDashboardRepository::new(&path);
        assert!(matches!(repository.load(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_empty_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "\n").unwrap();

        let repository = FileDashboardRepository::new(&path);
        assert!(repository.load().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_widgets_are_dropped_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(
            &path,
            r#"{
                "version": 1,
                "state": {
                    "widgets": [
                        { "id": "ok", "type": "table", "title": "News", "provider": "finnhub",
                          "endpoint": "/company-news", "mapping": { "columns": ["headline"] } },
                        { "id": "bad", "type": "table", "provider": "yahoo", "endpoint": "/x" }
                    ],
                    "hasSeenTour": false
                }
            }"#,
        )
        .unwrap();

        let repository = FileDashboardRepository::new(&path);
        let state = repository.load().unwrap().unwrap();
        assert_eq!(state.widgets.len(), 1);
        assert_eq!(state.widgets[0].id, "ok");
        assert_eq!(state.widgets[0].refresh_ms, 60_000);
    }
}
