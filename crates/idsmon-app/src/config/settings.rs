//! Config directory and `config.toml` loading

use std::path::{Path, PathBuf};

use idsmon_core::prelude::*;

use super::types::AppConfig;

pub const APP_DIR_NAME: &str = "ids-monitor";
pub const CONFIG_FILENAME: &str = "config.toml";
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// `<config_dir>/ids-monitor`, or `override_dir` when given
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME),
    }
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILENAME)
}

/// Load `config.toml`, falling back to defaults when missing or invalid.
pub fn load_config(config_dir: &Path) -> AppConfig {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return AppConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                debug!("Loaded config from {:?}", config_path);
                config
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            AppConfig::default()
        }
    }
}

/// Create the config directory and a commented default `config.toml`.
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# IDS Monitor Configuration

[backend]
endpoint = "ws://127.0.0.1:5000"
# executable = "backend/ids-backend"   # launched with the log directory as last argument
# args = []
startup_timeout_secs = 60

[dashboard]
max_entries = 50                       # cap for both the flow log and the alert list
default_model = "random-forest"        # random-forest | logistic-regression | support-vector-machine
                                       # | multilayer-perceptron | isolation-forest
default_mode = "live"                  # live | deep | replay

[replay]
# csv_path = "captures/flows.csv"      # labelled CSV on the backend host, required for replay
# delay_ms = 100
# max_flows = 1000
# start_row = 0
# end_row = 5000

[ui]
show_timestamps = true
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsmon_core::types::ModelKind;
    use tempfile::tempdir;

    #[test]
    fn test_config_dir_override() {
        let dir = config_dir(Some(Path::new("/tmp/custom")));
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
        assert!(config_dir(None).ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let temp = tempdir().unwrap();
        assert_eq!(load_config(temp.path()), AppConfig::default());
    }

    #[test]
    fn test_load_invalid_config_is_default() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "[backend\nendpoint=").unwrap();
        assert_eq!(load_config(temp.path()), AppConfig::default());
    }

    #[test]
    fn test_init_config_dir_writes_loadable_defaults() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested");
        init_config_dir(&dir).unwrap();

        let config = load_config(&dir);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dashboard.default_model, ModelKind::RandomForest);
    }

    #[test]
    fn test_init_config_dir_keeps_existing_file() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[dashboard]\nmax_entries = 10\n",
        )
        .unwrap();
        init_config_dir(temp.path()).unwrap();
        assert_eq!(load_config(temp.path()).dashboard.max_entries, 10);
    }
}
