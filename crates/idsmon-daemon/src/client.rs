//! Async WebSocket session client for the detection backend.
//!
//! The [`SessionClient`] owns at most one WebSocket connection. A background
//! task reads frames, parses them into [`BackendEvent`]s and hands each one
//! to the registered listeners, serially and in arrival order. Outbound
//! requests are fire-and-forget: they are queued to the background task and
//! never await a reply.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      SessionClient                         │
//! │                                                            │
//! │  start_scan() ──┐         ┌──────────────────────────────┐ │
//! │  stop_scan()  ──┼──cmd───▶│  Background task              │ │
//! │  request_*()  ──┘  chan   │  WebSocket read/write loop    │ │
//! │                           │  frame → parse → dispatch ────┼─┼──▶ listeners
//! │  subscribe() ─────────────┼──▶ ListenerRegistry           │ │
//! │                           └──────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use idsmon_core::events::{NetworkEvent, ScanStatus, ScanSummary, ServiceStatus};
use idsmon_core::prelude::*;

use crate::protocol::{
    parse_backend_message, BackendEvent, BackendMessage, ClientRequest, ConnectionEvent,
    EventKind, StartScanRequest,
};

/// Default backend endpoint.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:5000";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Current connection state of a [`SessionClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Never connected, or the connection has closed.
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Connected and ready to exchange messages.
    Connected,
}

/// Callback invoked for every event of the kind it was registered for.
pub type Listener = Arc<dyn Fn(&BackendEvent) + Send + Sync>;

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;

/// The five dashboard listeners registered together by [`SessionClient::subscribe`].
pub struct SessionHandlers {
    pub on_alert: Callback<serde_json::Value>,
    pub on_service_status: Callback<ServiceStatus>,
    pub on_scan_status: Callback<ScanStatus>,
    pub on_network_data: Callback<NetworkEvent>,
    pub on_scan_summary: Callback<ScanSummary>,
}

impl SessionHandlers {
    /// Route every handler into a single closure over [`BackendEvent`].
    pub fn forward_all<F>(f: F) -> Self
    where
        F: Fn(BackendEvent) + Send + Sync + Clone + 'static,
    {
        let alert = f.clone();
        let service = f.clone();
        let status = f.clone();
        let data = f.clone();
        Self {
            on_alert: Box::new(move |v| alert(BackendEvent::Alert(v))),
            on_service_status: Box::new(move |s| service(BackendEvent::ServiceStatus(s))),
            on_scan_status: Box::new(move |s| status(BackendEvent::ScanStatus(s))),
            on_network_data: Box::new(move |e| data(BackendEvent::NetworkData(e))),
            on_scan_summary: Box::new(move |s| f(BackendEvent::ScanSummary(s))),
        }
    }
}

// ---------------------------------------------------------------------------
// Listener registry
// ---------------------------------------------------------------------------

type ListenerId = u64;

#[derive(Default)]
struct ListenerRegistry {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    fn add(&mut self, id: ListenerId, kind: EventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push((id, listener));
    }

    fn remove(&mut self, ids: &[ListenerId]) {
        for entries in self.listeners.values_mut() {
            entries.retain(|(id, _)| !ids.contains(id));
        }
        self.listeners.retain(|_, entries| !entries.is_empty());
    }

    fn matching(&self, kind: EventKind) -> Vec<Listener> {
        self.listeners
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }

    fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Shared {
    state: RwLock<ConnectionState>,
    cmd_tx: Mutex<Option<mpsc::UnboundedSender<ClientCommand>>>,
    registry: Mutex<ListenerRegistry>,
    next_id: AtomicU64,
}

impl Shared {
    fn set_state(&self, new_state: ConnectionState) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = new_state;
    }

    fn state(&self) -> ConnectionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn register(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .add(id, kind, listener);
        id
    }

    fn unregister(&self, ids: &[ListenerId]) {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(ids);
    }

    /// Call every listener for the event's kind. The registry lock is released
    /// before any callback runs so listeners may subscribe or unsubscribe.
    fn dispatch(&self, event: &BackendEvent) {
        let listeners = self
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .matching(event.kind());
        if listeners.is_empty() {
            trace!("No listener for {}", event.kind().name());
        }
        for listener in listeners {
            listener(event);
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a group of registered listeners.
///
/// [`unsubscribe`](Subscription::unsubscribe) removes exactly the listeners this
/// handle registered. Dropping the handle does the same.
#[must_use = "dropping a Subscription removes its listeners"]
pub struct Subscription {
    shared: Arc<Shared>,
    ids: Vec<ListenerId>,
}

impl Subscription {
    pub fn unsubscribe(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        debug!("Removing {} backend listener(s)", self.ids.len());
        self.shared.unregister(&self.ids);
        self.ids.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("listeners", &self.ids.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Internal command type
// ---------------------------------------------------------------------------

/// Internal messages sent from the public API to the background task.
enum ClientCommand {
    Send(ClientRequest),
    /// Close the WebSocket and stop the background task.
    Disconnect,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ---------------------------------------------------------------------------
// SessionClient
// ---------------------------------------------------------------------------

/// Async WebSocket session client.
///
/// Cloning yields another handle to the same connection and listener set.
/// Inject one instance where it is needed rather than creating several.
#[derive(Clone)]
pub struct SessionClient {
    shared: Arc<Shared>,
}

impl Default for SessionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("connection_state", &self.shared.state())
            .finish()
    }
}

impl SessionClient {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(ConnectionState::Disconnected),
                cmd_tx: Mutex::new(None),
                registry: Mutex::new(ListenerRegistry::default()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Open the WebSocket to `endpoint` and start the background task.
    ///
    /// Idempotent: calling this while connecting or connected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the endpoint is not a `ws://`/`wss://`
    /// URL or the handshake fails.
    pub async fn connect(&self, endpoint: &str) -> Result<()> {
        {
            let mut guard = self.shared.state.write().unwrap_or_else(|e| e.into_inner());
            if *guard != ConnectionState::Disconnected {
                debug!("connect() ignored, client is {:?}", *guard);
                return Ok(());
            }
            *guard = ConnectionState::Connecting;
        }

        info!("Connecting to backend at {}", endpoint);
        let ws_stream = match connect_ws(endpoint).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Backend connection failed: {}", e);
                self.shared.set_state(ConnectionState::Disconnected);
                self.shared
                    .dispatch(&BackendEvent::Connection(ConnectionEvent::Disconnected {
                        reason: Some(e.to_string()),
                    }));
                return Err(e);
            }
        };

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        *self.shared.cmd_tx.lock().unwrap_or_else(|e| e.into_inner()) = Some(cmd_tx);
        self.shared.set_state(ConnectionState::Connected);
        info!("Connected to backend");
        self.shared
            .dispatch(&BackendEvent::Connection(ConnectionEvent::Connected {
                endpoint: endpoint.to_string(),
            }));

        tokio::spawn(run_client_task(
            ws_stream,
            cmd_rx,
            Arc::clone(&self.shared),
        ));

        Ok(())
    }

    /// Register the five dashboard handlers as one [`Subscription`].
    pub fn subscribe(&self, handlers: SessionHandlers) -> Subscription {
        let SessionHandlers {
            on_alert,
            on_service_status,
            on_scan_status,
            on_network_data,
            on_scan_summary,
        } = handlers;

        let ids = vec![
            self.shared.register(
                EventKind::Alert,
                Arc::new(move |ev: &BackendEvent| {
                    if let BackendEvent::Alert(v) = ev {
                        on_alert(v.clone());
                    }
                }),
            ),
            self.shared.register(
                EventKind::ServiceStatus,
                Arc::new(move |ev: &BackendEvent| {
                    if let BackendEvent::ServiceStatus(s) = ev {
                        on_service_status(s.clone());
                    }
                }),
            ),
            self.shared.register(
                EventKind::ScanStatus,
                Arc::new(move |ev: &BackendEvent| {
                    if let BackendEvent::ScanStatus(s) = ev {
                        on_scan_status(s.clone());
                    }
                }),
            ),
            self.shared.register(
                EventKind::NetworkData,
                Arc::new(move |ev: &BackendEvent| {
                    if let BackendEvent::NetworkData(e) = ev {
                        on_network_data(e.clone());
                    }
                }),
            ),
            self.shared.register(
                EventKind::ScanSummary,
                Arc::new(move |ev: &BackendEvent| {
                    if let BackendEvent::ScanSummary(s) = ev {
                        on_scan_summary(s.clone());
                    }
                }),
            ),
        ];

        Subscription {
            shared: Arc::clone(&self.shared),
            ids,
        }
    }

    /// Register a single listener for one event kind.
    pub fn listen<F>(&self, kind: EventKind, f: F) -> Subscription
    where
        F: Fn(&BackendEvent) + Send + Sync + 'static,
    {
        let id = self.shared.register(kind, Arc::new(f));
        Subscription {
            shared: Arc::clone(&self.shared),
            ids: vec![id],
        }
    }

    /// Ask the backend to begin capturing. Does not wait for a reply.
    pub fn start_scan(&self, request: StartScanRequest) {
        self.send(ClientRequest::StartScan(request));
    }

    /// Ask the backend to stop the running scan. Does not wait for a reply.
    pub fn stop_scan(&self) {
        self.send(ClientRequest::StopScan);
    }

    /// Ask the backend to publish its capture adapters as `interface_list`.
    pub fn request_interfaces(&self) {
        self.send(ClientRequest::RequestInterfaces);
    }

    /// Close the connection. Listeners stay registered.
    pub fn disconnect(&self) {
        if let Some(tx) = self
            .shared
            .cmd_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = tx.send(ClientCommand::Disconnect);
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state() == ConnectionState::Connected
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.shared
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .count(kind)
    }

    /// Sends while disconnected are dropped.
    fn send(&self, request: ClientRequest) {
        if !self.is_connected() {
            debug!("Not connected, dropping {}", request.name());
            return;
        }
        let guard = self.shared.cmd_tx.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(tx) => {
                if tx.send(ClientCommand::Send(request)).is_err() {
                    debug!("Client task gone, request dropped");
                }
            }
            None => debug!("No command channel, dropping {}", request.name()),
        }
    }

    /// Deliver an event to listeners as if it arrived from the backend.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn inject(&self, event: BackendEvent) {
        self.shared.dispatch(&event);
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_client_task(
    ws_stream: WsStream,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientCommand>,
    shared: Arc<Shared>,
) {
    let reason = run_io_loop(ws_stream, &mut cmd_rx, &shared).await;

    shared.set_state(ConnectionState::Disconnected);
    *shared.cmd_tx.lock().unwrap_or_else(|e| e.into_inner()) = None;
    match &reason {
        Some(r) => warn!("Backend connection lost: {}", r),
        None => info!("Backend connection closed"),
    }
    shared.dispatch(&BackendEvent::Connection(ConnectionEvent::Disconnected {
        reason,
    }));

    debug!("Session client background task exiting");
}

/// Returns the reason the connection ended, or `None` for a requested close.
async fn run_io_loop(
    ws_stream: WsStream,
    cmd_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    shared: &Shared,
) -> Option<String> {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            // ── Incoming WebSocket frame ─────────────────────────────────
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_ws_text(text.as_str(), shared);
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        return Some("backend closed the connection".to_string());
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary: ignored
                    }
                    Some(Err(err)) => {
                        return Some(format!("read error: {err}"));
                    }
                    None => {
                        return Some("stream ended".to_string());
                    }
                }
            }

            // ── Outgoing request from the public API ─────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Send(request)) => {
                        if let Err(e) = send_request(&request, &mut ws_sink).await {
                            return Some(e.to_string());
                        }
                    }
                    Some(ClientCommand::Disconnect) | None => {
                        let _ = ws_sink.send(WsMessage::Close(None)).await;
                        return None;
                    }
                }
            }
        }
    }
}

fn handle_ws_text(text: &str, shared: &Shared) {
    match parse_backend_message(text) {
        BackendMessage::Event(event) => {
            trace!("Backend event: {}", event.kind().name());
            shared.dispatch(&event);
        }
        BackendMessage::Unknown { event } => {
            debug!("Ignoring unknown backend event: {}", event);
        }
        BackendMessage::Malformed { reason } => {
            let preview: String = text.chars().take(120).collect();
            warn!("Dropping malformed backend frame ({}): {}", reason, preview);
        }
    }
}

async fn send_request(
    request: &ClientRequest,
    ws_sink: &mut SplitSink<WsStream, WsMessage>,
) -> Result<()> {
    let json = request
        .to_frame()
        .map_err(|e| Error::protocol(format!("Failed to serialize {}: {e}", request.name())))?;
    debug!("Sending {}", request.name());
    ws_sink
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| Error::connection(format!("Failed to send {}: {e}", request.name())))
}

/// Establish a new WebSocket connection to `endpoint`.
async fn connect_ws(endpoint: &str) -> Result<WsStream> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| Error::connection(format!("Invalid endpoint '{endpoint}': {e}")))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(Error::connection(format!(
            "Endpoint must use ws:// or wss://, got '{}'",
            url.scheme()
        )));
    }
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|err| Error::connection(format!("Failed to connect to backend: {err}")))?;
    Ok(ws_stream)
}
