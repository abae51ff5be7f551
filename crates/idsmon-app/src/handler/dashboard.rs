//! Scan control intents

use idsmon_core::prelude::*;
use idsmon_core::types::ModelKind;

use crate::state::{AppState, Notification};

use super::{UpdateAction, UpdateResult};

pub fn handle_start_scan(state: &mut AppState) -> UpdateResult {
    let controls = state.controls();
    if state.dashboard.is_running {
        debug!("Start ignored: scan already running");
        return UpdateResult::none();
    }
    if !controls.can_start {
        let notice = if state.dashboard.mode.needs_interface() {
            Notification::error(
                "No interface",
                "Select a capture interface on the settings page before starting a scan.",
            )
        } else {
            Notification::error(
                "No replay file",
                "Set csv_path under [replay] in config.toml or pass --replay.",
            )
        };
        state.notify(notice);
        return UpdateResult::none();
    }

    let request = state.dashboard.begin_scan(&state.settings);
    info!(
        "Starting {} scan with {} on {}",
        request.mode,
        state.dashboard.model,
        request
            .csv_path
            .as_deref()
            .or(request.interface.as_deref())
            .unwrap_or("auto")
    );
    UpdateResult::action(UpdateAction::SendStartScan(request))
}

pub fn handle_stop_scan(state: &mut AppState) -> UpdateResult {
    if !state.controls().can_stop {
        debug!("Stop ignored: nothing running");
        return UpdateResult::none();
    }
    state.dashboard.end_scan();
    info!("Stopping scan");
    UpdateResult::action(UpdateAction::SendStopScan)
}

/// Local only; applies to the next start.
pub fn handle_model_change(state: &mut AppState, model: ModelKind) -> UpdateResult {
    debug!("Model selected: {}", model);
    state.dashboard.set_model(model);
    UpdateResult::none()
}

pub fn handle_toggle_mode(state: &mut AppState) -> UpdateResult {
    state.dashboard.mode = state.dashboard.mode.toggle();
    debug!("Scan mode: {}", state.dashboard.mode);
    UpdateResult::none()
}
