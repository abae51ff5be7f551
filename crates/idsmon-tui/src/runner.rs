//! TUI runner - entry point and event loop

use idsmon_app::{Engine, EngineOptions};
use idsmon_core::Result;
use tracing::{debug, info};

use super::{event, render, terminal};

/// Run the interactive dashboard until the user quits or a signal arrives.
///
/// The backend is launched and the connection attempted before the
/// terminal switches to the alternate screen, so launch failures print
/// normally.
pub async fn run(options: EngineOptions) -> Result<()> {
    terminal::install_panic_hook();

    let mut engine = Engine::new(options);
    engine.start().await?;
    info!(
        "Dashboard starting (endpoint {}, backend pid {:?})",
        engine.endpoint(),
        engine.backend_pid()
    );

    let mut term = ratatui::init();
    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    ratatui::restore();

    result
}

/// Main event loop
fn run_loop(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        // Signals, session events and finished tasks
        let drained = engine.drain_pending_messages();
        if drained > 0 {
            debug!("Processed {} queued messages", drained);
        }

        terminal.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    Ok(())
}
