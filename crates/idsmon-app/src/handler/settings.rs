//! Settings page handlers

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::{SaveOutcome, Settings};
use crate::settings_form::SettingsField;
use crate::state::{AppState, Notification, UiMode};

use super::{Task, UpdateAction, UpdateResult};

pub fn handle_show_settings(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Settings;
    if state.connection.is_connected() && state.form.interfaces.is_empty() {
        return UpdateResult::action(UpdateAction::RequestInterfaces);
    }
    UpdateResult::none()
}

/// Unsaved edits survive leaving the page until discarded.
pub fn handle_hide_settings(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Dashboard;
    UpdateResult::none()
}

pub fn handle_settings_loaded(
    state: &mut AppState,
    result: Result<Option<Settings>, String>,
) -> UpdateResult {
    match result {
        Ok(Some(settings)) => {
            info!("Settings loaded");
            state.apply_settings(settings);
        }
        Ok(None) => {
            debug!("No saved settings, using defaults");
            state.settings_loaded = true;
        }
        Err(e) => {
            error!("Failed to load settings: {}", e);
            state.notify(Notification::error("Settings not loaded", e));
        }
    }
    UpdateResult::none()
}

pub fn handle_save_settings(state: &mut AppState) -> UpdateResult {
    let draft = state.form.draft.clone();
    UpdateResult::action(UpdateAction::SpawnTask(Task::SaveSettings(draft)))
}

pub fn handle_settings_saved(
    state: &mut AppState,
    settings: Settings,
    outcome: SaveOutcome,
) -> UpdateResult {
    if outcome.success {
        info!("Settings saved");
        state.apply_settings(settings);
        state.notify(Notification::success("Settings saved", "Your settings were saved."));
    } else {
        let reason = outcome
            .error
            .unwrap_or_else(|| "Unknown error".to_string());
        warn!("Settings save failed: {}", reason);
        state.notify(Notification::error("Save failed", reason));
    }
    UpdateResult::none()
}

pub fn handle_discard_settings(state: &mut AppState) -> UpdateResult {
    let current = state.settings.clone();
    state.form.reset(&current);
    UpdateResult::none()
}

pub fn handle_refresh_interfaces(state: &mut AppState) -> UpdateResult {
    if !state.connection.is_connected() {
        state.notify(Notification::info(
            "Not connected",
            "The adapter list is fetched from the backend once it is connected.",
        ));
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::RequestInterfaces)
}

pub fn handle_browse(state: &mut AppState) -> UpdateResult {
    let candidate = state.form.draft.log_path.trim();
    if candidate.is_empty() {
        state.notify(Notification::info(
            "No folder",
            "Type a folder path first, then press Enter to check it.",
        ));
        return UpdateResult::none();
    }
    let candidate = PathBuf::from(candidate);
    UpdateResult::action(UpdateAction::SpawnTask(Task::SelectFolder(candidate)))
}

pub fn handle_folder_selected(
    state: &mut AppState,
    candidate: PathBuf,
    path: Option<PathBuf>,
) -> UpdateResult {
    match path {
        Some(path) => state.form.set_log_path(path.display().to_string()),
        None => state.notify(Notification::error(
            "Not a folder",
            format!("{} is not an existing directory.", candidate.display()),
        )),
    }
    UpdateResult::none()
}

pub fn handle_cycle(state: &mut AppState, forward: bool) -> UpdateResult {
    match state.form.focus {
        SettingsField::Interface => {
            state.form.cycle_interface(forward);
        }
        SettingsField::StartOnBoot => state.form.toggle_boot(),
        SettingsField::Guid | SettingsField::LogPath => {}
    }
    UpdateResult::none()
}
