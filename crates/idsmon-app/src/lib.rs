//! idsmon-app - Application state and orchestration for IDS Monitor
//!
//! Implements the TEA (The Elm Architecture) loop for the dashboard: a
//! [`Message`] enum, the [`AppState`] model, the `update()` function in
//! [`handler`], and the [`Engine`] that wires it to the session client, the
//! settings store and the optional backend process.

pub mod actions;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod settings_form;
pub mod signals;
pub mod state;

pub use dashboard::{Controls, DashboardState, FlowOutcome};
pub use engine::{Engine, EngineOptions};
pub use engine_event::EngineEvent;
pub use handler::{Task, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use settings_form::{SettingsField, SettingsForm};
pub use state::{
    AppPhase, AppState, ConnectionStatus, Notification, NotificationKind, UiMode,
};
