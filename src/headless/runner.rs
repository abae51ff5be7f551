//! Headless runner - engine loop without a TUI
//!
//! Drives the same [`Engine`] as the dashboard, forwards every engine event
//! to stdout as NDJSON and accepts line commands on stdin.

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use idsmon_app::{AppState, Engine, EngineEvent, EngineOptions, Message};
use idsmon_core::prelude::Result;

use super::HeadlessEvent;

/// Run in headless mode. With `auto_start`, a scan starts as soon as the
/// backend is connected and settings are loaded.
pub async fn run_headless(options: EngineOptions, auto_start: bool) -> Result<()> {
    info!("Starting in headless mode (auto start: {})", auto_start);

    let mut engine = Engine::new(options);
    let mut events = engine.subscribe();

    if let Err(e) = engine.start().await {
        HeadlessEvent::error(e.to_string(), true).emit();
        engine.shutdown().await;
        return Err(e);
    }

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    let result = headless_event_loop(&mut engine, &mut events, auto_start).await;

    engine.shutdown().await;
    emit_pending_events(&mut events);

    info!("Headless mode exiting");
    result
}

async fn headless_event_loop(
    engine: &mut Engine,
    events: &mut broadcast::Receiver<EngineEvent>,
    auto_start: bool,
) -> Result<()> {
    let mut pending_start = auto_start;

    while !engine.should_quit() {
        let Some(msg) = engine.msg_rx.recv().await else {
            info!("Message channel closed");
            break;
        };
        engine.process_message(msg);

        if pending_start && ready_to_start(&engine.state) {
            pending_start = false;
            info!("Auto-starting scan");
            engine.process_message(Message::StartScan);
        }

        emit_pending_events(events);

        // Auto-dismiss so a repeated notice is emitted again
        if engine.state.has_notification() {
            engine.process_message(Message::DismissNotification);
        }
    }

    Ok(())
}

fn ready_to_start(state: &AppState) -> bool {
    state.connection.is_connected() && state.settings_loaded
}

fn emit_pending_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Map one stdin line to a message
fn parse_command(line: &str) -> Option<Message> {
    match line.trim() {
        "s" | "start" => Some(Message::StartScan),
        "x" | "stop" => Some(Message::StopScan),
        "m" | "model" => Some(Message::NextModel),
        "v" | "mode" => Some(Message::ToggleScanMode),
        "i" | "interfaces" => Some(Message::RefreshInterfaces),
        "w" | "save" => Some(Message::SaveSettings),
        "q" | "quit" => Some(Message::Quit),
        _ => None,
    }
}

/// Read line commands from stdin until EOF or `quit` (blocking thread)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::UnboundedSender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match parse_command(trimmed) {
                    Some(msg) => {
                        info!("Stdin command: {}", trimmed);
                        let quit = matches!(msg, Message::Quit);
                        if msg_tx.send(msg).is_err() || quit {
                            break;
                        }
                    }
                    None => warn!("Unknown stdin command: {}", trimmed),
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
