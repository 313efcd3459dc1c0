//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::error::TransportError;

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command without blocking the frame. A rejected command hands its
/// call back with the reason so the caller can settle it as a failed reply.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), (BackendCommand, TransportError)> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            tracing::warn!(command = cmd_name, "ui->backend queue full");
            Err((
                cmd,
                TransportError::new("UI command queue is full; please retry"),
            ))
        }
        Err(TrySendError::Disconnected(cmd)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err((
                cmd,
                TransportError::new(
                    "Backend command processor disconnected (possible startup/runtime failure)",
                ),
            ))
        }
    }
}
