use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{config::load_settings, NoteGateway, RestNoteGateway};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::NotesApp;

#[derive(Parser, Debug)]
#[command(name = "notes-manager", about = "Desktop client for a hosted notes table")]
struct Args {
    /// TOML settings file; `notes.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    supabase_url: Option<String>,
    #[arg(long)]
    supabase_key: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(args.supabase_url, args.supabase_key);
    let gateway = RestNoteGateway::new(&settings);
    if !gateway.is_configured() {
        tracing::warn!("remote store is not fully configured; every request will fail");
    }
    let gateway: Arc<dyn NoteGateway> = Arc::new(gateway);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let _worker = backend_bridge::runtime::launch(cmd_rx, ui_tx, gateway);

    let user_id = settings.user_id;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Notes Manager")
            .with_inner_size([1024.0, 700.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Notes Manager",
        options,
        Box::new(move |_cc| Ok(Box::new(NotesApp::new(cmd_tx, ui_rx, user_id)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop shell exited with an error: {err}"))
}
