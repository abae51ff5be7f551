//! Inbound session events

use idsmon_core::events::InterfaceInfo;
use idsmon_core::prelude::*;
use idsmon_daemon::{BackendEvent, ConnectionEvent};

use crate::state::{AppState, ConnectionStatus};

use super::{UpdateAction, UpdateResult};

pub fn handle_backend_event(state: &mut AppState, event: BackendEvent) -> UpdateResult {
    match event {
        BackendEvent::NetworkData(ev) => {
            state.dashboard.on_network_data(&ev);
            UpdateResult::none()
        }
        BackendEvent::ScanStatus(status) => {
            state.dashboard.on_scan_status(&status);
            UpdateResult::none()
        }
        BackendEvent::ScanSummary(summary) => {
            state.dashboard.on_scan_summary(summary);
            UpdateResult::none()
        }
        BackendEvent::ScanComplete(complete) => {
            state.dashboard.on_scan_complete(complete);
            UpdateResult::none()
        }
        BackendEvent::ScanError(err) => {
            state.dashboard.on_scan_error(&err);
            UpdateResult::none()
        }
        BackendEvent::InterfaceList(list) => handle_interface_list(state, list),

        // No state effect yet
        BackendEvent::Alert(alert) => {
            debug!("Backend alert: {}", alert);
            UpdateResult::none()
        }
        BackendEvent::ServiceStatus(status) => {
            debug!(
                "Service status {}: {}",
                status.state.as_deref().unwrap_or("-"),
                status.message.as_deref().unwrap_or("-")
            );
            UpdateResult::none()
        }

        BackendEvent::Connection(conn) => handle_connection(state, conn),
    }
}

fn handle_interface_list(state: &mut AppState, list: Vec<InterfaceInfo>) -> UpdateResult {
    info!("Backend reported {} interface(s)", list.len());
    state.form.set_interfaces(list);
    UpdateResult::none()
}

fn handle_connection(state: &mut AppState, event: ConnectionEvent) -> UpdateResult {
    match event {
        ConnectionEvent::Connected { endpoint } => {
            state.connection = ConnectionStatus::Connected { endpoint };
            UpdateResult::action(UpdateAction::RequestInterfaces)
        }
        ConnectionEvent::Disconnected { reason } => {
            state.connection = ConnectionStatus::Lost { reason };
            UpdateResult::none()
        }
    }
}
