//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, NoteGateway};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker. Every command runs as its own task, so
/// replies reach the UI in the order they resolve. A full UI queue delays a
/// reply; it never drops one.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    gateway: Arc<dyn NoteGateway>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            let name = cmd.name();
            let call = cmd.into_call();
            let gateway = Arc::clone(&gateway);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                tracing::debug!(command = name, "backend: executing");
                let reply = execute(&gateway, call).await;
                let delivered =
                    tokio::task::spawn_blocking(move || ui_tx.send(UiEvent::Reply(reply))).await;
                match delivered {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) => tracing::debug!(command = name, "ui gone; reply dropped"),
                    Err(err) => tracing::error!(command = name, "reply hand-off failed: {err}"),
                }
            });
        }
        tracing::info!("backend command queue closed; worker exiting");
    })
}
