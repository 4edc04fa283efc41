mod backend_bridge;
mod controller;
mod media;
mod ui;

use client_core::{
    config::{load_settings, normalize_base_url, DEFAULT_API_BASE_URL},
    SegmentationClient,
};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread},
    controller::events::UiEvent,
    ui::SegmentationApp,
};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let base_url = match normalize_base_url(&settings.api_base_url) {
        Ok(base_url) => base_url,
        Err(err) => {
            tracing::warn!("{err:#}; using {DEFAULT_API_BASE_URL}");
            DEFAULT_API_BASE_URL.to_string()
        }
    };
    let client = SegmentationClient::new(base_url);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(client.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nuclei-Segmentation with AI")
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    let preview_dir = settings.preview_dir;
    eframe::run_native(
        "Nuclei-Segmentation with AI",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(SegmentationApp::new(
                client,
                preview_dir,
                cmd_tx,
                ui_rx,
            )))
        }),
    )
}
