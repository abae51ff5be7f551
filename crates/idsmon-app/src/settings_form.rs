//! Settings page draft: the editable copy of [`Settings`] plus adapter choice

use idsmon_core::events::InterfaceInfo;

use crate::config::Settings;

/// Focusable rows on the settings page, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Interface,
    Guid,
    LogPath,
    StartOnBoot,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Interface,
        SettingsField::Guid,
        SettingsField::LogPath,
        SettingsField::StartOnBoot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::Interface => "Capture interface",
            SettingsField::Guid => "Interface GUID",
            SettingsField::LogPath => "Log path",
            SettingsField::StartOnBoot => "Start on boot",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SettingsField::Interface => SettingsField::Guid,
            SettingsField::Guid => SettingsField::LogPath,
            SettingsField::LogPath => SettingsField::StartOnBoot,
            SettingsField::StartOnBoot => SettingsField::Interface,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsField::Interface => SettingsField::StartOnBoot,
            SettingsField::Guid => SettingsField::Interface,
            SettingsField::LogPath => SettingsField::Guid,
            SettingsField::StartOnBoot => SettingsField::LogPath,
        }
    }

    /// Free-text fields accept typed characters. The GUID is read-only; it
    /// only changes together with the adapter name.
    pub fn is_text(&self) -> bool {
        matches!(self, SettingsField::LogPath)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub draft: Settings,
    pub interfaces: Vec<InterfaceInfo>,
    /// Index into `interfaces` matching the draft's guid, if any
    pub selected_interface: Option<usize>,
    pub focus: SettingsField,
    /// Draft differs from the last loaded or saved settings
    pub dirty: bool,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            draft: settings.clone(),
            ..Default::default()
        }
    }

    /// Replace the draft with `settings`, keeping the adapter list.
    pub fn reset(&mut self, settings: &Settings) {
        self.draft = settings.clone();
        self.dirty = false;
        self.sync_selection();
    }

    /// Replace the adapter list. With no guid chosen yet, the first
    /// adapter is pre-selected.
    pub fn set_interfaces(&mut self, interfaces: Vec<InterfaceInfo>) {
        self.interfaces = interfaces;
        if self.draft.guid.trim().is_empty() && !self.interfaces.is_empty() {
            self.select_interface(0);
        } else {
            self.sync_selection();
        }
    }

    /// Name and guid always come from the same adapter.
    pub fn select_interface(&mut self, index: usize) -> bool {
        let Some(info) = self.interfaces.get(index) else {
            return false;
        };
        self.draft.capture_interface = info.name.clone();
        self.draft.guid = info.guid.clone();
        self.selected_interface = Some(index);
        self.dirty = true;
        true
    }

    pub fn cycle_interface(&mut self, forward: bool) -> bool {
        let len = self.interfaces.len();
        if len == 0 {
            return false;
        }
        let next = match (self.selected_interface, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.select_interface(next)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.focused_text_mut() {
            field.push(c);
            self.dirty = true;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text_mut() {
            if field.pop().is_some() {
                self.dirty = true;
            }
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.focused_text_mut() {
            if !field.is_empty() {
                field.clear();
                self.dirty = true;
            }
        }
    }

    pub fn toggle_boot(&mut self) {
        self.draft.start_on_boot = self.draft.start_on_boot.toggle();
        self.dirty = true;
    }

    pub fn set_log_path(&mut self, path: String) {
        if self.draft.log_path != path {
            self.draft.log_path = path;
            self.dirty = true;
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_interface
            .and_then(|i| self.interfaces.get(i))
            .map(|info| info.name.as_str())
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SettingsField::LogPath => Some(&mut self.draft.log_path),
            _ => None,
        }
    }

    fn sync_selection(&mut self) {
        let guid = self.draft.guid.trim();
        self.selected_interface = if guid.is_empty() {
            None
        } else {
            self.interfaces.iter().position(|i| i.guid == guid)
        };
    }
}
