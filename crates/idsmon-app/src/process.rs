//! Message processing: run update() and dispatch resulting actions

use std::sync::Arc;

use tokio::sync::mpsc;

use idsmon_daemon::SessionClient;

use crate::actions::handle_action;
use crate::config::SettingsStore;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message and every follow-up it produces
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::UnboundedSender<Message>,
    session: &SessionClient,
    store: &Arc<S>,
) where
    S: SettingsStore + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx, session, store);
        }

        msg = result.message;
    }
}
