//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use idsmon_daemon::SessionClient;

use crate::config::SettingsStore;
use crate::handler::{Task, UpdateAction};
use crate::message::Message;

/// Execute an action. Backend sends are fire-and-forget; store work runs on
/// its own task and reports back through `msg_tx`.
pub fn handle_action<S>(
    action: UpdateAction,
    msg_tx: &mpsc::UnboundedSender<Message>,
    session: &SessionClient,
    store: &Arc<S>,
) where
    S: SettingsStore + Send + Sync + 'static,
{
    match action {
        UpdateAction::SendStartScan(request) => session.start_scan(request),
        UpdateAction::SendStopScan => session.stop_scan(),
        UpdateAction::RequestInterfaces => session.request_interfaces(),
        UpdateAction::SpawnTask(task) => {
            let msg_tx = msg_tx.clone();
            let store = Arc::clone(store);
            tokio::spawn(async move {
                let msg = execute_task(task, store.as_ref()).await;
                if msg_tx.send(msg).is_err() {
                    debug!("Message channel closed, task result dropped");
                }
            });
        }
    }
}

/// Run one store operation and turn its result into a message.
pub async fn execute_task<S>(task: Task, store: &S) -> Message
where
    S: SettingsStore + Sync,
{
    match task {
        Task::LoadSettings => {
            let result = store.load().await.map_err(|e| {
                warn!("Settings load failed: {}", e);
                e.to_string()
            });
            Message::SettingsLoaded { result }
        }
        Task::SaveSettings(settings) => {
            let outcome = store.save(settings.clone()).await;
            Message::SettingsSaved { settings, outcome }
        }
        Task::SelectFolder(candidate) => {
            let path = store.select_folder(candidate.clone()).await;
            Message::FolderSelected { candidate, path }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileSettingsStore, SaveOutcome, Settings};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load_through_tasks() {
        let temp = tempdir().unwrap();
        let store = FileSettingsStore::new(temp.path().join("settings.toml"));
        let settings = Settings {
            guid: "G".into(),
            ..Default::default()
        };

        match execute_task(Task::SaveSettings(settings.clone()), &store).await {
            Message::SettingsSaved { outcome, .. } => assert_eq!(outcome, SaveOutcome::ok()),
            other => panic!("unexpected {other:?}"),
        }
        match execute_task(Task::LoadSettings, &store).await {
            Message::SettingsLoaded { result } => assert_eq!(result, Ok(Some(settings))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_error_becomes_message_text() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "guid = [").unwrap();
        let store = FileSettingsStore::new(path);

        match execute_task(Task::LoadSettings, &store).await {
            Message::SettingsLoaded { result } => assert!(result.is_err()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_select_folder_task() {
        let temp = tempdir().unwrap();
        let store = FileSettingsStore::new(temp.path().join("settings.toml"));

        let missing = temp.path().join("nope");
        match execute_task(Task::SelectFolder(missing.clone()), &store).await {
            Message::FolderSelected { candidate, path } => {
                assert_eq!(candidate, missing);
                assert!(path.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawned_task_reports_back() {
        let temp = tempdir().unwrap();
        let store = Arc::new(FileSettingsStore::new(temp.path().join("settings.toml")));
        let session = SessionClient::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_action(
            UpdateAction::SpawnTask(Task::LoadSettings),
            &tx,
            &session,
            &store,
        );
        let msg = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(msg, Message::SettingsLoaded { result: Ok(None) }));
    }
}
