//! # idsmon-daemon - Backend Session and Process Management
//!
//! Talks to the external detection backend: the WebSocket session client,
//! the JSON wire protocol, and the launcher that spawns the backend process
//! and waits for its readiness handshake.
//!
//! Depends on [`idsmon_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Session Client
//! - [`SessionClient`] - Connect, subscribe to events, send scan requests
//! - [`SessionHandlers`] - The five dashboard event handlers
//! - [`Subscription`] - RAII handle removing exactly the listeners it registered
//!
//! ### Protocol
//! - [`ClientRequest`], [`StartScanRequest`] - Outbound requests
//! - [`BackendEvent`], [`EventKind`] - Inbound events
//! - [`parse_backend_message()`] - Parse one WebSocket text frame
//!
//! ### Process Management
//! - [`BackendProcess`] - Spawn, await `BACKEND_READY`, kill on shutdown

pub mod client;
pub mod process;
pub mod protocol;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    ConnectionState, Listener, SessionClient, SessionHandlers, Subscription, DEFAULT_ENDPOINT,
};
pub use process::{
    resolve_program, BackendLaunch, BackendProcess, BACKEND_READY_TOKEN, DEFAULT_STARTUP_TIMEOUT,
};
pub use protocol::{
    parse_backend_message, BackendEvent, BackendMessage, ClientRequest, ConnectionEvent,
    EventKind, StartScanRequest,
};
