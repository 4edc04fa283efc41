use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use client_core::{
    view::{self, Panel, ResultView},
    RequestController, RequestError, SegmentationClient, SubmitOutcome, UrlResolver,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Color32, TextureHandle};
use shared::domain::IMAGE_OPTIONS;

use crate::{
    backend_bridge::commands::{BackendCommand, ResultImageKind},
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
    media::{decode_rgba, DecodedImage},
};

const PREVIEW_WIDTH: f32 = 140.0;
const RESULT_IMAGE_WIDTH: f32 = 420.0;

pub struct SegmentationApp {
    controller: RequestController,
    resolver: SegmentationClient,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    preview_dir: PathBuf,
    previews: HashMap<&'static str, Option<TextureHandle>>,
    result_seq: Option<u64>,
    pending_images: Vec<(ResultImageKind, DecodedImage)>,
    result_images: HashMap<ResultImageKind, TextureHandle>,
    result_image_errors: HashMap<ResultImageKind, String>,
    status: String,
}

impl SegmentationApp {
    pub fn new(
        resolver: SegmentationClient,
        preview_dir: PathBuf,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            controller: RequestController::new(),
            resolver,
            cmd_tx,
            ui_rx,
            preview_dir,
            previews: HashMap::new(),
            result_seq: None,
            pending_images: Vec::new(),
            result_images: HashMap::new(),
            result_image_errors: HashMap::new(),
            status: String::new(),
        }
    }

    fn clear_result_images(&mut self) {
        self.result_seq = None;
        self.pending_images.clear();
        self.result_images.clear();
        self.result_image_errors.clear();
    }

    fn select_image(&mut self, name: &str) {
        let had_in_flight = self.controller.in_flight_seq().is_some();
        if let Err(err) = self.controller.select_image(name) {
            self.status = err.to_string();
            return;
        }
        self.status.clear();
        self.clear_result_images();
        if had_in_flight {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::CancelSegment,
                &mut self.status,
            );
        }
    }

    fn submit(&mut self) {
        let SubmitOutcome::Started(ticket) = self.controller.submit() else {
            return;
        };
        self.status.clear();
        self.clear_result_images();
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Segment {
                seq: ticket.seq,
                image_name: ticket.image_name,
            },
            &mut self.status,
        );
        if !queued {
            let error = RequestError::Transport(self.status.clone());
            self.controller.on_rejected(ticket.seq, error);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::SegmentCompleted { seq, outcome } => {
                if !self.controller.complete(seq, outcome) {
                    return;
                }
                let Some(result) = self.controller.result() else {
                    return;
                };
                let requests = [
                    (
                        ResultImageKind::Segmented,
                        self.resolver.resolve_url(&result.result_image_url),
                    ),
                    (
                        ResultImageKind::Histogram,
                        self.resolver.resolve_url(&result.histogram_url),
                    ),
                ];
                self.result_seq = Some(seq);
                for (kind, url) in requests {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::FetchResultImage { seq, kind, url },
                        &mut self.status,
                    );
                }
            }
            UiEvent::ResultImageLoaded { seq, kind, image } => {
                if self.result_seq == Some(seq) {
                    self.pending_images.push((kind, image));
                }
            }
            UiEvent::ResultImageFailed { seq, kind, reason } => {
                if self.result_seq == Some(seq) {
                    tracing::warn!(?kind, "failed to load result image: {reason}");
                    self.result_image_errors.insert(kind, reason);
                }
            }
        }
    }

    fn upload_pending_textures(&mut self, ctx: &egui::Context) {
        for (kind, image) in self.pending_images.drain(..) {
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
            let texture = ctx.load_texture(
                format!("result-image:{kind:?}"),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            self.result_images.insert(kind, texture);
        }
    }

    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        name: &'static str,
        asset: &str,
    ) -> Option<TextureHandle> {
        let preview_dir = &self.preview_dir;
        self.previews
            .entry(name)
            .or_insert_with(|| {
                let path = preview_dir.join(asset);
                let bytes = fs::read(&path).ok()?;
                match decode_rgba(&bytes) {
                    Ok(image) => Some(ctx.load_texture(
                        format!("preview:{name}"),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [image.width, image.height],
                            &image.rgba,
                        ),
                        egui::TextureOptions::LINEAR,
                    )),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), "unreadable preview asset: {err}");
                        None
                    }
                }
            })
            .clone()
    }

    fn show_selection(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading("Selecione uma Imagem");
        let is_loading = self.controller.is_loading();
        let selected = self.controller.selected_image().map(|option| option.name);
        let mut clicked = None;

        ui.horizontal_wrapped(|ui| {
            for option in IMAGE_OPTIONS.iter() {
                let preview = self.preview_texture(ctx, option.name, option.preview_asset);
                ui.vertical(|ui| {
                    if let Some(texture) = &preview {
                        ui.add(egui::Image::new(texture).max_width(PREVIEW_WIDTH));
                    }
                    let button =
                        egui::Button::new(option.name).selected(selected == Some(option.name));
                    if ui.add_enabled(!is_loading, button).clicked() {
                        clicked = Some(option.name);
                    }
                });
            }
        });

        if let Some(name) = clicked {
            self.select_image(name);
        }

        if let Some(option) = self.controller.selected_image() {
            ui.label(format!("Imagem selecionada: {}", option.name));
        }

        let submit = egui::Button::new(view::submit_label(self.controller.is_loading()));
        if ui.add_enabled(self.controller.can_submit(), submit).clicked() {
            self.submit();
        }
    }

    fn show_result(&self, ui: &mut egui::Ui, result: &ResultView) {
        ui.heading("Resultados da Análise");
        ui.horizontal(|ui| {
            ui.label("Núcleos Detectados");
            ui.strong(result.nuclei_count.to_string());
            ui.separator();
            ui.label("Imagem Analisada");
            ui.strong(&result.image_name);
        });

        ui.add_space(8.0);
        ui.label("Estatísticas");
        egui::Grid::new("segmentation_statistics")
            .striped(true)
            .show(ui, |ui| {
                for row in &result.stats {
                    ui.label(row.label);
                    ui.label(&row.value);
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            self.show_result_image(
                ui,
                ResultImageKind::Segmented,
                "Imagem Segmentada",
                &result.result_image_url,
            );
            self.show_result_image(
                ui,
                ResultImageKind::Histogram,
                "Histograma",
                &result.histogram_url,
            );
        });
    }

    fn show_result_image(&self, ui: &mut egui::Ui, kind: ResultImageKind, title: &str, url: &str) {
        ui.vertical(|ui| {
            ui.strong(title);
            if let Some(texture) = self.result_images.get(&kind) {
                ui.add(egui::Image::new(texture).max_width(RESULT_IMAGE_WIDTH));
            } else if let Some(reason) = self.result_image_errors.get(&kind) {
                ui.colored_label(Color32::LIGHT_RED, reason);
            } else {
                ui.spinner();
            }
            ui.hyperlink_to(url, url);
        });
    }
}

impl eframe::App for SegmentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.upload_pending_textures(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Nuclei-Segmentation with AI");
                ui.label("Selecione uma imagem para análise de segmentação de núcleos");
                ui.separator();

                self.show_selection(ctx, ui);
                ui.separator();

                match view::render(self.controller.state(), &self.resolver) {
                    Panel::Idle => {}
                    Panel::Loading { headline, hint } => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(headline);
                        });
                        ui.weak(hint);
                    }
                    Panel::Error(message) => {
                        ui.colored_label(Color32::LIGHT_RED, format!("⚠ {message}"));
                    }
                    Panel::Result(result) => self.show_result(ui, &result),
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.weak(&self.status);
                }
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
