//! Configuration and settings persistence for IDS Monitor
//!
//! Files live in `<config_dir>/ids-monitor/`:
//! - `config.toml` - Application configuration (backend endpoint, caps, defaults)
//! - `settings.toml` - User settings edited on the settings page

pub mod settings;
pub mod store;
pub mod types;

pub use settings::{
    config_dir, init_config_dir, load_config, settings_path, APP_DIR_NAME, CONFIG_FILENAME,
    SETTINGS_FILENAME,
};
pub use store::{
    load_settings_file, save_settings_file, select_folder, FileSettingsStore, LocalSettingsStore,
    SaveOutcome, SettingsStore,
};
pub use types::*;
