//! Handler module - TEA update function and event handlers
//!
//! - `update`: main `update()` and message dispatch
//! - `keys`: key routing per UI mode
//! - `dashboard`: scan control intents
//! - `settings`: settings page intents and store results
//! - `backend`: inbound session events

pub(crate) mod backend;
pub(crate) mod dashboard;
pub(crate) mod keys;
pub(crate) mod settings;
pub(crate) mod update;


use std::path::PathBuf;

use idsmon_daemon::StartScanRequest;

use crate::config::Settings;
use crate::message::Message;

pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// One-way `start_scan` to the backend
    SendStartScan(StartScanRequest),
    /// One-way `stop_scan` to the backend
    SendStopScan,
    /// One-way `request_interfaces` to the backend
    RequestInterfaces,
    /// Run a settings store operation off the loop
    SpawnTask(Task),
}

/// Settings store work, reported back as a [`Message`]
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    LoadSettings,
    SaveSettings(Settings),
    SelectFolder(PathBuf),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
