// Hide console window in release builds (Windows GUI app)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod app;
mod app_data;
mod cli;
mod config;
mod flow;
mod input;
mod panel;
mod scene;
mod spatial;
mod task;
mod ui;
mod video;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "encore=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Any arguments mean CLI mode; bare invocation starts the client
    if std::env::args().len() > 1 {
        let cli = cli::Cli::parse();
        return cli::run(cli).await;
    }

    tracing::info!("Starting Encore client");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1024.0, 640.0])
        .with_min_inner_size([640.0, 480.0])
        .with_title("Encore - Karaoke");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        "Encore",
        native_options,
        Box::new(|cc| Ok(Box::new(app::EncoreApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
