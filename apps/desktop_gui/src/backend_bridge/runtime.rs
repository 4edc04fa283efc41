//! Backend worker: owns the tokio runtime and the HTTP client, executes
//! queued commands and reports back through the UI event queue.

use std::thread;

use client_core::{SegmentationBackend, SegmentationClient};
use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use crate::{
    backend_bridge::commands::BackendCommand, controller::events::UiEvent, media::decode_rgba,
};

pub fn spawn_backend_thread(
    client: SegmentationClient,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!(base_url = client.base_url(), "backend worker ready");
            let mut segment_task: Option<JoinHandle<()>> = None;

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Segment { seq, image_name } => {
                        if let Some(task) = segment_task.take() {
                            task.abort();
                        }
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        segment_task = Some(tokio::spawn(async move {
                            let outcome = client.segment(&image_name).await;
                            let _ = ui_tx.send(UiEvent::SegmentCompleted { seq, outcome });
                        }));
                    }
                    BackendCommand::CancelSegment => {
                        if let Some(task) = segment_task.take() {
                            tracing::debug!("aborting in-flight segmentation task");
                            task.abort();
                        }
                    }
                    BackendCommand::FetchResultImage { seq, kind, url } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.fetch_bytes(&url).await {
                                Ok(bytes) => match decode_rgba(&bytes) {
                                    Ok(image) => UiEvent::ResultImageLoaded { seq, kind, image },
                                    Err(reason) => UiEvent::ResultImageFailed { seq, kind, reason },
                                },
                                Err(err) => UiEvent::ResultImageFailed {
                                    seq,
                                    kind,
                                    reason: err.to_string(),
                                },
                            };
                            let _ = ui_tx.send(event);
                        });
                    }
                }
            }

            if let Some(task) = segment_task.take() {
                task.abort();
            }
        });
    });
}
