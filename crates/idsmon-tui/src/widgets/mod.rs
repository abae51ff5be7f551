//! Custom widget components
//!
//! Every widget is a pure renderer over borrowed state.

mod control_bar;
mod flow_table;
mod header;
pub mod modal_overlay;
mod model_panel;
mod notification;
mod settings_panel;
mod summary_panel;
mod traffic_info;

pub use control_bar::ControlBar;
pub use flow_table::{FlowTable, FlowTableKind};
pub use header::MainHeader;
pub use model_panel::ModelPanel;
pub use notification::NotificationModal;
pub use settings_panel::SettingsPanel;
pub use summary_panel::SummaryPanel;
pub use traffic_info::TrafficInfo;

/// `N/A` for missing values, otherwise fixed precision plus `suffix`
pub(crate) fn format_optional(value: Option<f64>, precision: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.precision$}{suffix}"),
        None => "N/A".to_string(),
    }
}

pub(crate) fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
