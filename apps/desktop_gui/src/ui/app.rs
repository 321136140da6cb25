use std::collections::HashMap;

use client_core::ClientSettings;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{ImageId, RequestGeneration};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, submit_selection};
use crate::controller::reducer::ViewController;
use crate::media::FileSelection;
use crate::ui::panels::{self, Chrome, UiAction};
use crate::ui::theme::{self, Palette};

const SERVICE_UNKNOWN: &str = "Service: checking...";

#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub settings: ClientSettings,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: ViewController,
    textures: HashMap<ImageId, TextureHandle>,
    status: String,
    service_line: String,
    endpoint: String,
    palette: Palette,
    theme_applied: bool,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let endpoint = startup
            .settings
            .predict_url()
            .map(|url| url.to_string())
            .unwrap_or_else(|_| startup.settings.api_base.clone());
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: ViewController::new(),
            textures: HashMap::new(),
            status: "Ready".to_string(),
            service_line: SERVICE_UNKNOWN.to_string(),
            endpoint,
            palette: Palette::default(),
            theme_applied: false,
        };
        app.bootstrap();
        app
    }

    fn bootstrap(&mut self) {
        let _ = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::CheckHealth,
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::info!("{message}");
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                }
                UiEvent::ServiceReachable(message) => {
                    self.service_line = format!("Service: {message}");
                }
                UiEvent::ServiceUnreachable(err) => {
                    self.service_line = format!("Service unreachable ({})", err.message());
                }
                UiEvent::PredictionSucceeded {
                    generation,
                    result,
                    preprocessed,
                } => {
                    if self.controller.show_result(generation, &result, preprocessed) {
                        self.status = format!(
                            "{}: {} ({})",
                            self.controller
                                .view()
                                .selected_name
                                .as_deref()
                                .unwrap_or("image"),
                            result.prediction,
                            result.confidence_text()
                        );
                    }
                }
                UiEvent::PredictionFailed { generation, error } => {
                    self.apply_failure(generation, &error);
                }
            }
        }
    }

    fn apply_failure(&mut self, generation: RequestGeneration, error: &UiError) {
        if self.controller.fail_request(generation, error) {
            self.status = error.status_line();
        }
    }

    fn submit(&mut self, selection: FileSelection) {
        let _ = submit_selection(&mut self.controller, &self.cmd_tx, selection, &mut self.status);
    }

    fn browse(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_file() {
            self.submit(FileSelection::from_path(path));
        }
    }

    /// Only the first dropped file is used.
    fn take_dropped_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        if let Some(file) = dropped {
            match FileSelection::from_dropped(&file) {
                Some(selection) => self.submit(selection),
                None => tracing::warn!(name = %file.name, "dropped file carried no data"),
            }
        }
    }

    /// Uploads textures for images the view shows and frees the rest.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let view = self.controller.view();
        let panes = [&view.original.image, &view.preprocessed.image];
        for pane_image in panes.into_iter().flatten() {
            self.textures.entry(pane_image.id).or_insert_with(|| {
                let image = &pane_image.image;
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width, image.height],
                    &image.rgba,
                );
                ctx.load_texture(
                    format!("pane-image:{}", pane_image.id.0),
                    color_image,
                    egui::TextureOptions::LINEAR,
                )
            });
        }
        let live: Vec<ImageId> = view.image_ids().collect();
        self.textures.retain(|id, _| live.contains(id));
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.theme_applied {
            return;
        }
        theme::apply(ctx, &self.palette);
        self.theme_applied = true;
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Browse => self.browse(),
            UiAction::TryAgain => {
                self.controller.try_again();
                self.status = "Ready".to_string();
            }
            UiAction::DismissNotice => self.controller.dismiss_notice(),
        }
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);
        self.take_dropped_file(ctx);
        self.sync_textures(ctx);

        let drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let actions = panels::render(
            ctx,
            self.controller.view(),
            &self.textures,
            &Chrome {
                status_line: &self.status,
                service_line: &self.service_line,
                endpoint: &self.endpoint,
                drag_hover,
                palette: &self.palette,
            },
        );
        for action in actions {
            self.handle_action(action);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
