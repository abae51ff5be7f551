//! Settings persistence
//!
//! The settings blob lives in `settings.toml`. Writes go to a temp file that
//! is renamed over the target while an exclusive lock on a sidecar lock file
//! is held, so a concurrent reader never sees a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;

use idsmon_core::prelude::*;

use super::types::Settings;

const LOCK_FILENAME: &str = ".settings.lock";
const TEMP_FILENAME: &str = ".settings.toml.tmp";

/// Result of a save, reported to the user verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl From<Result<()>> for SaveOutcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => SaveOutcome::ok(),
            Err(e) => SaveOutcome::failed(e.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Blocking file operations
// ─────────────────────────────────────────────────────────

/// Read the settings file. `Ok(None)` when it does not exist yet.
pub fn load_settings_file(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        debug!("No settings file at {:?}", path);
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
    let settings = toml::from_str(&content)
        .map_err(|e| Error::config_invalid(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded settings from {:?}", path);
    Ok(Some(settings))
}

/// Atomically replace the settings file.
pub fn save_settings_file(path: &Path, settings: &Settings) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::config(format!("Failed to create settings dir: {}", e)))?;

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let lock = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(dir.join(LOCK_FILENAME))
        .map_err(|e| Error::config(format!("Failed to open settings lock: {}", e)))?;
    lock.lock_exclusive()
        .map_err(|e| Error::config(format!("Failed to lock settings: {}", e)))?;

    let temp_path = dir.join(TEMP_FILENAME);
    let mut temp = std::fs::File::create(&temp_path)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.sync_all())
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    drop(temp);

    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    // lock released when `lock` drops
    info!("Saved settings to {:?}", path);
    Ok(())
}

/// Resolve a folder chosen for the log path.
///
/// Expands a leading `~`, canonicalizes, and returns the path only when it is
/// an existing directory.
pub fn select_folder(candidate: &Path) -> Option<PathBuf> {
    if candidate.as_os_str().is_empty() {
        return None;
    }

    let expanded = match candidate.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()?.join(rest),
        Err(_) => candidate.to_path_buf(),
    };

    match dunce::canonicalize(&expanded) {
        Ok(path) if path.is_dir() => Some(path),
        Ok(path) => {
            debug!("Not a directory: {:?}", path);
            None
        }
        Err(e) => {
            debug!("Cannot resolve {:?}: {}", expanded, e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────
// Store trait
// ─────────────────────────────────────────────────────────

/// Async access to the settings blob.
///
/// Calls never block the caller's thread.
#[trait_variant::make(SettingsStore: Send)]
pub trait LocalSettingsStore {
    /// `Ok(None)` when nothing has been saved yet
    async fn load(&self) -> Result<Option<Settings>>;

    async fn save(&self, settings: Settings) -> SaveOutcome;

    async fn select_folder(&self, candidate: PathBuf) -> Option<PathBuf>;
}

/// [`SettingsStore`] backed by a TOML file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<Settings>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_settings_file(&path))
            .await
            .map_err(|e| Error::config(format!("Settings load task failed: {}", e)))?
    }

    async fn save(&self, settings: Settings) -> SaveOutcome {
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || save_settings_file(&path, &settings)).await {
            Ok(result) => result.into(),
            Err(e) => SaveOutcome::failed(format!("Settings save task failed: {}", e)),
        }
    }

    async fn select_folder(&self, candidate: PathBuf) -> Option<PathBuf> {
        tokio::task::spawn_blocking(move || select_folder(&candidate))
            .await
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    // importing both store traits makes method calls ambiguous
    use super::{
        load_settings_file, save_settings_file, select_folder, FileSettingsStore, SaveOutcome,
        Settings, SettingsStore, TEMP_FILENAME,
    };
    use crate::config::types::StartOnBoot;
    use idsmon_core::Error;
    use std::path::Path;
    use tempfile::tempdir;

    fn sample() -> Settings {
        Settings {
            capture_interface: "Ethernet".into(),
            guid: "\\Device\\NPF_{ABC}".into(),
            log_path: "/var/log/ids".into(),
            start_on_boot: StartOnBoot::On,
        }
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = tempdir().unwrap();
        let loaded = load_settings_file(&temp.path().join("settings.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        save_settings_file(&path, &sample()).unwrap();

        assert_eq!(load_settings_file(&path).unwrap(), Some(sample()));
        assert!(!temp.path().join(TEMP_FILENAME).exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a").join("b").join("settings.toml");
        save_settings_file(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_partial_file_defaults_missing_fields() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "guid = \"X\"\n").unwrap();
        let loaded = load_settings_file(&path).unwrap().unwrap();
        assert_eq!(loaded.guid, "X");
        assert_eq!(loaded.start_on_boot, StartOnBoot::Off);
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "guid = ").unwrap();
        let err = load_settings_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_save_outcome_from_error_keeps_message() {
        let outcome: SaveOutcome = Err(Error::config("disk full")).into();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("disk full"));
    }

    #[test]
    fn test_select_folder() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(select_folder(temp.path()).is_some());
        assert!(select_folder(&file).is_none());
        assert!(select_folder(&temp.path().join("missing")).is_none());
        assert!(select_folder(Path::new("")).is_none());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip_off_thread() {
        let temp = tempdir().unwrap();
        let store = FileSettingsStore::new(temp.path().join("settings.toml"));

        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(store.save(sample()).await, SaveOutcome::ok());
        assert_eq!(store.load().await.unwrap(), Some(sample()));
        assert!(store.select_folder(temp.path().to_path_buf()).await.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_save_failure_is_reported() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let store = FileSettingsStore::new(blocker.join("settings.toml"));

        let outcome = store.save(sample()).await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
