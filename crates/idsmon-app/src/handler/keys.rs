//! Key event handlers for UI modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::settings_form::SettingsField;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Ctrl+C always quits, even over a notification
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if state.has_notification() {
        return handle_key_notification(key);
    }

    match state.ui_mode {
        UiMode::Dashboard => handle_key_dashboard(key),
        UiMode::Settings => handle_key_settings(state, key),
    }
}

/// Notification modal swallows everything but dismissal
fn handle_key_notification(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Esc => Some(Message::DismissNotification),
        _ => None,
    }
}

fn handle_key_dashboard(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),

        InputKey::Char('s') => Some(Message::StartScan),
        InputKey::Char('x') => Some(Message::StopScan),

        InputKey::Char('m') => Some(Message::NextModel),
        InputKey::Char('M') => Some(Message::PrevModel),
        InputKey::Char('v') => Some(Message::ToggleScanMode),

        InputKey::Tab | InputKey::Char('2') => Some(Message::ShowSettings),

        _ => None,
    }
}

fn handle_key_settings(state: &AppState, key: InputKey) -> Option<Message> {
    let focus = state.form.focus;

    match key {
        InputKey::CharCtrl('s') => Some(Message::SaveSettings),
        InputKey::CharCtrl('d') => Some(Message::DiscardSettings),
        InputKey::CharCtrl('r') => Some(Message::RefreshInterfaces),
        InputKey::CharCtrl('u') => Some(Message::SettingsClearField),

        InputKey::Esc | InputKey::Tab => Some(Message::ShowDashboard),

        InputKey::Up | InputKey::BackTab => Some(Message::SettingsFocusPrev),
        InputKey::Down => Some(Message::SettingsFocusNext),
        InputKey::Left => Some(Message::SettingsCycle { forward: false }),
        InputKey::Right => Some(Message::SettingsCycle { forward: true }),

        InputKey::Enter => match focus {
            SettingsField::LogPath => Some(Message::BrowseLogPath),
            SettingsField::Interface | SettingsField::StartOnBoot => {
                Some(Message::SettingsCycle { forward: true })
            }
            SettingsField::Guid => Some(Message::SettingsFocusNext),
        },

        InputKey::Backspace | InputKey::Delete if focus.is_text() => {
            Some(Message::SettingsBackspace)
        }
        InputKey::Char(c) if focus.is_text() => Some(Message::SettingsInput(c)),

        // '1' only navigates when not typing
        InputKey::Char('1') => Some(Message::ShowDashboard),
        InputKey::Char(' ') => Some(Message::SettingsCycle { forward: true }),

        _ => None,
    }
}
