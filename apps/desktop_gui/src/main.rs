mod backend_bridge;
mod controller;
mod media;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use backend_bridge::{commands::BackendCommand, runtime};
use clap::Parser;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use ui::{DesktopGuiApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "bioprint-desktop", about = "Upload an image and show the predicted label")]
struct Args {
    /// Prediction service origin, e.g. http://127.0.0.1:8000
    #[arg(long)]
    api_base: Option<String>,
    /// Explicit client config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let settings = client_core::load_settings(args.config.as_deref(), args.api_base.as_deref())?;
    let endpoint = settings
        .predict_url()
        .context("invalid prediction service address")?;
    tracing::info!(%endpoint, "starting desktop client");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("BIOPRINT Desktop")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([820.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "BIOPRINT Desktop",
        options,
        Box::new(|_cc| {
            Ok(Box::new(DesktopGuiApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig { settings },
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}
