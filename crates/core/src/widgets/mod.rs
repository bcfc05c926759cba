//! Widgets module - domain models, services, traits, and view projection.

mod widget_view;
mod widgets_model;
mod widgets_service;
mod widgets_traits;

pub use widget_view::{
    project_widget, project_with_candles, CardField, LinePoint, TableView, WidgetView,
};
pub use widgets_model::{
    move_item, resolve_title, widgets_from_value, CardMapping, DashboardExport, DashboardState,
    LineMapping, NewWidget, TableMapping, Widget, WidgetMapping, WidgetType, DEFAULT_REFRESH_MS,
    EXPORT_VERSION, UNTITLED_WIDGET,
};
pub use widgets_service::DashboardService;
pub use widgets_traits::{DashboardRepositoryTrait, DashboardServiceTrait};
