//! Engine - shared orchestration for the TUI and headless runners
//!
//! Owns the TEA state, the message channel, the session client and its
//! subscriptions, the settings store, the optional backend process and the
//! shutdown signal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};

use idsmon_core::events::{InterfaceInfo, ScanComplete, ScanSummary};
use idsmon_core::prelude::*;
use idsmon_core::types::ScanMode;
use idsmon_daemon::{
    resolve_program, BackendEvent, BackendLaunch, BackendProcess, EventKind, SessionClient,
    SessionHandlers, Subscription,
};

use crate::actions::handle_action;
use crate::config::{self, FileSettingsStore, Settings};
use crate::engine_event::EngineEvent;
use crate::handler::{Task, UpdateAction};
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::{AppState, ConnectionStatus, Notification};

/// Command-line overrides applied on top of `config.toml`
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub config_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub backend: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    /// Replay CSV; also makes replay the initial scan mode
    pub replay: Option<PathBuf>,
}

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect what
/// changed and emit the matching [`EngineEvent`]s.
#[derive(Debug, Clone)]
struct StateSnapshot {
    connection: ConnectionStatus,
    is_running: bool,
    is_scanning: bool,
    flows_seen: u64,
    threats_detected: u64,
    duplicates_dropped: u64,
    summary: Option<ScanSummary>,
    scan_complete: Option<ScanComplete>,
    last_scan_error: Option<String>,
    interfaces: Vec<InterfaceInfo>,
    settings: Settings,
    notification: Option<Notification>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        let d = &state.dashboard;
        Self {
            connection: state.connection.clone(),
            is_running: d.is_running,
            is_scanning: d.metrics.is_scanning,
            flows_seen: d.flows_seen,
            threats_detected: d.threats_detected,
            duplicates_dropped: d.duplicates_dropped,
            summary: d.summary.clone(),
            scan_complete: d.scan_complete.clone(),
            last_scan_error: d.last_scan_error.clone(),
            interfaces: state.form.interfaces.clone(),
            settings: state.settings.clone(),
            notification: state.notification.clone(),
        }
    }
}

pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the message channel. Unbounded so events bridged
    /// from session listeners are never dropped.
    pub msg_tx: mpsc::UnboundedSender<Message>,

    /// Receiver half; the frontend loop drains it.
    pub msg_rx: mpsc::UnboundedReceiver<Message>,

    pub shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,

    session: SessionClient,
    subscriptions: Vec<Subscription>,
    store: Arc<FileSettingsStore>,
    backend: Option<BackendProcess>,
    backend_program: Option<PathBuf>,

    endpoint: String,
    config_dir: PathBuf,
    log_dir: PathBuf,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Build the engine. Must be called inside a tokio runtime.
    ///
    /// - Creates the config directory (non-fatal if it fails)
    /// - Loads `config.toml` and applies `options`
    /// - Creates the message, shutdown and event channels
    /// - Spawns the signal handler
    /// - Bridges session events into the message channel
    pub fn new(options: EngineOptions) -> Self {
        let config_dir = config::config_dir(options.config_dir.as_deref());
        if let Err(e) = config::init_config_dir(&config_dir) {
            warn!("Failed to initialize config directory: {}", e);
        }

        let mut app_config = config::load_config(&config_dir);
        if let Some(endpoint) = options.endpoint {
            app_config.backend.endpoint = endpoint;
        }
        if let Some(csv) = options.replay {
            app_config.replay.csv_path = Some(csv);
            app_config.dashboard.default_mode = ScanMode::Replay;
        }
        let backend_program = options
            .backend
            .or_else(|| app_config.backend.executable.clone())
            .map(|p| resolve_program(&p, &config_dir));
        let log_dir = options
            .log_dir
            .unwrap_or_else(idsmon_core::logging::default_log_directory);
        let endpoint = app_config.backend.endpoint.clone();

        let state = AppState::with_config(app_config);

        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Message>();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        signals::spawn_signal_handler(msg_tx.clone());

        let session = SessionClient::new();
        let subscriptions = bridge_session_events(&session, &msg_tx);
        let store = Arc::new(FileSettingsStore::new(config::settings_path(&config_dir)));

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            session,
            subscriptions,
            store,
            backend: None,
            backend_program,
            endpoint,
            config_dir,
            log_dir,
            event_tx,
        }
    }

    /// Launch the backend if configured, load settings and connect.
    ///
    /// # Errors
    ///
    /// Backend launch failures are fatal and returned. A failed connection
    /// is only reported through the connection status.
    pub async fn start(&mut self) -> Result<()> {
        if let Some(program) = self.backend_program.clone() {
            let timeout = Duration::from_secs(self.state.config.backend.startup_timeout_secs);
            let launch = BackendLaunch::new(program, self.log_dir.clone())
                .with_args(self.state.config.backend.args.clone())
                .with_timeout(timeout);
            self.backend = Some(BackendProcess::launch(&launch).await?);
        }

        handle_action(
            UpdateAction::SpawnTask(Task::LoadSettings),
            &self.msg_tx,
            &self.session,
            &self.store,
        );

        self.state.connection = ConnectionStatus::Connecting;
        if let Err(e) = self.session.connect(&self.endpoint).await {
            warn!("Continuing without backend connection: {}", e);
        }
        Ok(())
    }

    /// Subscribe to engine events.
    ///
    /// Slow subscribers lose the oldest events (`RecvError::Lagged`).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle and emit
    /// events for whatever changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.session,
            &self.store,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages. Returns how many ran.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    pub fn msg_sender(&self) -> mpsc::UnboundedSender<Message> {
        self.msg_tx.clone()
    }

    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Path {
        self.store.path()
    }

    pub fn backend_pid(&self) -> Option<u32> {
        self.backend.as_ref().and_then(BackendProcess::id)
    }

    /// Stop any running scan, drop listeners, disconnect and stop the
    /// backend process.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        if self.state.dashboard.is_running || self.state.dashboard.metrics.is_scanning {
            info!("Stopping scan before exit");
            self.session.stop_scan();
        }

        self.subscriptions.clear();
        self.session.disconnect();
        let _ = self.shutdown_tx.send(true);

        if let Some(mut backend) = self.backend.take() {
            backend.shutdown().await;
        }
        info!("Engine shut down");
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let dashboard = &self.state.dashboard;

        if pre.connection != post.connection {
            self.emit(EngineEvent::ConnectionChanged {
                connected: post.connection.is_connected(),
                detail: post.connection.label(),
            });
        }

        if !pre.is_running && post.is_running {
            self.emit(EngineEvent::ScanStarted {
                model: dashboard.model,
                mode: dashboard.mode,
            });
        }
        if pre.is_running && !post.is_running {
            self.emit(EngineEvent::ScanStopped);
        }
        if pre.is_scanning != post.is_scanning {
            self.emit(EngineEvent::ScanningChanged {
                is_scanning: post.is_scanning,
            });
        }

        if post.flows_seen > pre.flows_seen {
            if let Some(entry) = dashboard.logs.newest() {
                self.emit(EngineEvent::FlowReceived {
                    entry: entry.clone(),
                });
            }
        }
        if post.threats_detected > pre.threats_detected {
            if let Some(entry) = dashboard.alerts.newest() {
                self.emit(EngineEvent::AlertRaised {
                    entry: entry.clone(),
                });
            }
        }
        if post.duplicates_dropped > pre.duplicates_dropped {
            self.emit(EngineEvent::DuplicateFlow {
                flow_number: dashboard.metrics.flow_number,
            });
        }

        if pre.summary != post.summary {
            if let Some(summary) = &post.summary {
                self.emit(EngineEvent::SummaryUpdated {
                    summary: summary.clone(),
                });
            }
        }
        if pre.scan_complete != post.scan_complete {
            if let Some(complete) = &post.scan_complete {
                self.emit(EngineEvent::ScanCompleted {
                    complete: complete.clone(),
                });
            }
        }
        if pre.last_scan_error != post.last_scan_error {
            if let Some(error) = &post.last_scan_error {
                self.emit(EngineEvent::ScanFailed {
                    error: error.clone(),
                });
            }
        }

        if pre.interfaces != post.interfaces {
            self.emit(EngineEvent::InterfacesUpdated {
                interfaces: post.interfaces.clone(),
            });
        }
        if pre.settings != post.settings {
            self.emit(EngineEvent::SettingsChanged {
                settings: post.settings.clone(),
            });
        }
        if pre.notification != post.notification {
            if let Some(notification) = &post.notification {
                self.emit(EngineEvent::Notification {
                    notification: notification.clone(),
                });
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

/// Forward every inbound event kind into the message channel, in order.
fn bridge_session_events(
    session: &SessionClient,
    msg_tx: &mpsc::UnboundedSender<Message>,
) -> Vec<Subscription> {
    let tx = msg_tx.clone();
    let mut subscriptions = vec![session.subscribe(SessionHandlers::forward_all(
        move |event: BackendEvent| {
            let _ = tx.send(Message::Backend(event));
        },
    ))];

    for kind in [
        EventKind::InterfaceList,
        EventKind::ScanError,
        EventKind::ScanComplete,
        EventKind::Connection,
    ] {
        let tx = msg_tx.clone();
        subscriptions.push(session.listen(kind, move |event: &BackendEvent| {
            let _ = tx.send(Message::Backend(event.clone()));
        }));
    }

    subscriptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsmon_daemon::test_utils::MockBackend;
    use idsmon_daemon::ClientRequest;
    use tempfile::{tempdir, TempDir};

    fn engine_for(endpoint: String) -> (Engine, TempDir) {
        let temp = tempdir().unwrap();
        let engine = Engine::new(EngineOptions {
            config_dir: Some(temp.path().to_path_buf()),
            endpoint: Some(endpoint),
            backend: None,
            log_dir: Some(temp.path().join("logs")),
            replay: None,
        });
        (engine, temp)
    }

    /// Process channel messages until `pred` holds or two seconds pass.
    async fn pump_until(engine: &mut Engine, pred: impl Fn(&AppState) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !pred(&engine.state) {
            match tokio::time::timeout_at(deadline, engine.msg_rx.recv()).await {
                Ok(Some(msg)) => engine.process_message(msg),
                _ => break,
            }
        }
    }

    #[tokio::test]
    async fn test_new_registers_all_listeners() {
        let (engine, _temp) = engine_for("ws://127.0.0.1:1".into());
        for kind in [
            EventKind::Alert,
            EventKind::ServiceStatus,
            EventKind::ScanStatus,
            EventKind::NetworkData,
            EventKind::ScanSummary,
            EventKind::InterfaceList,
            EventKind::Connection,
        ] {
            assert_eq!(engine.session().listener_count(kind), 1, "{kind:?}");
        }
    }

    #[tokio::test]
    async fn test_endpoint_override_and_settings_path() {
        let (engine, temp) = engine_for("ws://example:9".into());
        assert_eq!(engine.endpoint(), "ws://example:9");
        assert_eq!(engine.settings_path(), temp.path().join("settings.toml"));
    }

    #[tokio::test]
    async fn test_replay_override_selects_replay_mode() {
        let temp = tempdir().unwrap();
        let engine = Engine::new(EngineOptions {
            config_dir: Some(temp.path().to_path_buf()),
            replay: Some(PathBuf::from("captures/friday.csv")),
            ..Default::default()
        });
        assert_eq!(engine.state.dashboard.mode, ScanMode::Replay);
        assert_eq!(
            engine.state.dashboard.replay.csv_path,
            Some(PathBuf::from("captures/friday.csv"))
        );
    }

    #[tokio::test]
    async fn test_start_connects_and_requests_interfaces() {
        let mut backend = MockBackend::start().await;
        let (mut engine, _temp) = engine_for(backend.endpoint());
        let mut events = engine.subscribe();

        engine.start().await.unwrap();
        pump_until(&mut engine, |s| s.connection.is_connected() && s.settings_loaded).await;

        assert!(engine.state.connection.is_connected());
        assert_eq!(
            backend.next_request().await,
            Some(ClientRequest::RequestInterfaces)
        );
        assert!(matches!(
            events.try_recv(),
            Ok(EngineEvent::ConnectionChanged {
                connected: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_backend_flow_reaches_dashboard_and_events() {
        let backend = MockBackend::start().await;
        let (mut engine, _temp) = engine_for(backend.endpoint());
        let mut events = engine.subscribe();

        engine.start().await.unwrap();
        pump_until(&mut engine, |s| s.connection.is_connected()).await;

        backend.emit(
            "network_data",
            serde_json::json!({"flow_number": 1, "predicted_label": "DDoS"}),
        );
        pump_until(&mut engine, |s| s.dashboard.logs.len() == 1).await;
        assert_eq!(engine.state.dashboard.alerts.len(), 1);

        let mut kinds = Vec::new();
        while let Ok(ev) = events.try_recv() {
            kinds.push(ev.event_type());
        }
        assert!(kinds.contains(&"flow"));
        assert!(kinds.contains(&"alert_flow"));
        assert!(kinds.contains(&"scanning_changed"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_running_scan_and_unsubscribes() {
        let mut backend = MockBackend::start().await;
        let (mut engine, _temp) = engine_for(backend.endpoint());
        engine.start().await.unwrap();
        pump_until(&mut engine, |s| s.connection.is_connected()).await;
        assert_eq!(
            backend.next_request().await,
            Some(ClientRequest::RequestInterfaces)
        );

        engine.state.apply_settings(Settings {
            guid: "G".into(),
            ..Default::default()
        });
        engine.process_message(Message::StartScan);
        assert!(matches!(
            backend.next_request().await,
            Some(ClientRequest::StartScan(_))
        ));

        engine.shutdown().await;
        assert_eq!(backend.next_request().await, Some(ClientRequest::StopScan));
        assert_eq!(engine.session().listener_count(EventKind::NetworkData), 0);
        assert!(*engine.shutdown_rx.borrow());
    }

    #[tokio::test]
    async fn test_connect_failure_is_not_fatal() {
        let (mut engine, _temp) = engine_for("ws://127.0.0.1:1".into());
        engine.start().await.unwrap();
        pump_until(&mut engine, |s| {
            matches!(s.connection, ConnectionStatus::Lost { .. })
        })
        .await;
        assert!(matches!(
            engine.state.connection,
            ConnectionStatus::Lost { reason: Some(_) }
        ));
    }
}
