//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{backend, dashboard, keys::handle_key, settings, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => UpdateResult::none(),

        Message::Backend(event) => backend::handle_backend_event(state, event),

        // ─────────────────────────────────────────────────────────
        // Dashboard
        // ─────────────────────────────────────────────────────────
        Message::StartScan => dashboard::handle_start_scan(state),
        Message::StopScan => dashboard::handle_stop_scan(state),
        Message::NextModel => {
            let next = state.dashboard.model.next();
            dashboard::handle_model_change(state, next)
        }
        Message::PrevModel => {
            let prev = state.dashboard.model.prev();
            dashboard::handle_model_change(state, prev)
        }
        Message::ToggleScanMode => dashboard::handle_toggle_mode(state),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::ShowDashboard => settings::handle_hide_settings(state),
        Message::ShowSettings => settings::handle_show_settings(state),
        Message::DismissNotification => {
            state.notification = None;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Settings
        // ─────────────────────────────────────────────────────────
        Message::SettingsLoaded { result } => settings::handle_settings_loaded(state, result),
        Message::SaveSettings => settings::handle_save_settings(state),
        Message::SettingsSaved { settings, outcome } => {
            settings::handle_settings_saved(state, settings, outcome)
        }
        Message::DiscardSettings => settings::handle_discard_settings(state),
        Message::RefreshInterfaces => settings::handle_refresh_interfaces(state),
        Message::BrowseLogPath => settings::handle_browse(state),
        Message::FolderSelected { candidate, path } => {
            settings::handle_folder_selected(state, candidate, path)
        }
        Message::SettingsFocusNext => {
            state.form.focus_next();
            UpdateResult::none()
        }
        Message::SettingsFocusPrev => {
            state.form.focus_prev();
            UpdateResult::none()
        }
        Message::SettingsCycle { forward } => settings::handle_cycle(state, forward),
        Message::SettingsInput(c) => {
            state.form.input_char(c);
            UpdateResult::none()
        }
        Message::SettingsBackspace => {
            state.form.backspace();
            UpdateResult::none()
        }
        Message::SettingsClearField => {
            state.form.clear_field();
            UpdateResult::none()
        }
    }
}
