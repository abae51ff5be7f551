//! Test utilities for the session client
//!
//! [`MockBackend`] is a loopback WebSocket server that records the requests a
//! client sends and lets a test push backend events down the connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::protocol::ClientRequest;

/// Loopback backend bound to an ephemeral port.
pub struct MockBackend {
    addr: SocketAddr,
    requests: mpsc::UnboundedReceiver<ClientRequest>,
    outbound: mpsc::UnboundedSender<String>,
    connections: Arc<AtomicUsize>,
    connected: Arc<Notify>,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Bind and start accepting connections.
    ///
    /// # Panics
    /// Panics if no loopback port can be bound.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("local addr");

        let (req_tx, requests) = mpsc::unbounded_channel();
        let (outbound, out_rx) = mpsc::unbounded_channel::<String>();
        let out_rx = Arc::new(Mutex::new(out_rx));
        let connections = Arc::new(AtomicUsize::new(0));
        let connected = Arc::new(Notify::new());

        let task = tokio::spawn(accept_loop(
            listener,
            req_tx,
            out_rx,
            Arc::clone(&connections),
            Arc::clone(&connected),
        ));

        Self {
            addr,
            requests,
            outbound,
            connections,
            connected,
            task,
        }
    }

    /// `ws://` URL of the server.
    pub fn endpoint(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Queue an event frame for the connected client.
    pub fn emit(&self, event: &str, data: serde_json::Value) {
        let frame = serde_json::json!({ "event": event, "data": data }).to_string();
        let _ = self.outbound.send(frame);
    }

    /// Next request received from the client, or `None` after two seconds.
    pub async fn next_request(&mut self) -> Option<ClientRequest> {
        tokio::time::timeout(Duration::from_secs(2), self.requests.recv())
            .await
            .ok()
            .flatten()
    }

    /// Resolves once a client has completed the WebSocket handshake.
    pub async fn wait_for_connection(&self) {
        if self.connection_count() > 0 {
            return;
        }
        let _ = tokio::time::timeout(Duration::from_secs(2), self.connected.notified()).await;
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn accept_loop(
    listener: TcpListener,
    req_tx: mpsc::UnboundedSender<ClientRequest>,
    out_rx: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
    connections: Arc<AtomicUsize>,
    connected: Arc<Notify>,
) {
    while let Ok((stream, _)) = listener.accept().await {
        let Ok(ws) = accept_async(stream).await else {
            continue;
        };
        connections.fetch_add(1, Ordering::SeqCst);
        connected.notify_one();

        let (mut sink, mut source) = ws.split();
        let mut outbound = out_rx.lock().await;
        loop {
            tokio::select! {
                frame = source.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Ok(req) = serde_json::from_str::<ClientRequest>(text.as_str()) {
                            let _ = req_tx.send(req);
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                out = outbound.recv() => match out {
                    Some(text) => {
                        if sink.send(WsMessage::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_endpoint_is_loopback_ws() {
        let backend = MockBackend::start().await;
        assert!(backend.endpoint().starts_with("ws://127.0.0.1:"));
        assert_eq!(backend.connection_count(), 0);
    }
}
