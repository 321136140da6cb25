//! Immediate-mode rendering of a `ViewState`. Panels never mutate state; they
//! report what the user asked for as `UiAction`s.

use std::collections::HashMap;

use eframe::egui;
use egui::TextureHandle;
use shared::domain::ImageId;

use crate::controller::reducer::{ImagePane, PredictionCard, StatusPanel, UiState, ViewState};
use crate::ui::theme::Palette;

const PANE_MAX_SIZE: egui::Vec2 = egui::vec2(320.0, 320.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Browse,
    TryAgain,
    DismissNotice,
}

/// Window decoration that lives outside the view state.
pub struct Chrome<'a> {
    pub status_line: &'a str,
    pub service_line: &'a str,
    pub endpoint: &'a str,
    pub drag_hover: bool,
    pub palette: &'a Palette,
}

pub fn render(
    ctx: &egui::Context,
    view: &ViewState,
    textures: &HashMap<ImageId, TextureHandle>,
    chrome: &Chrome<'_>,
) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let palette = chrome.palette;

    egui::TopBottomPanel::top("header")
        .frame(
            egui::Frame::NONE
                .fill(palette.panel_background)
                .inner_margin(egui::Margin::symmetric(12, 10)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("BIOPRINT")
                        .strong()
                        .size(20.0)
                        .color(palette.title_text),
                );
                ui.label(egui::RichText::new("image prediction").color(palette.hint_text));
            });
        });

    egui::TopBottomPanel::bottom("footer")
        .frame(
            egui::Frame::NONE
                .fill(palette.panel_background)
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(chrome.status_line).color(palette.hint_text));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} @ {}", chrome.service_line, chrome.endpoint))
                            .small()
                            .color(palette.hint_text),
                    );
                });
            });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(8.0);
        if upload_area(ui, view, chrome) {
            actions.push(UiAction::Browse);
        }
        ui.add_space(8.0);
        status_panel(ui, &view.status, palette);
        ui.add_space(8.0);

        ui.columns(3, |columns| {
            image_pane(&mut columns[0], "Original", &view.original, textures, palette);
            image_pane(
                &mut columns[1],
                "Preprocessed",
                &view.preprocessed,
                textures,
                palette,
            );
            if prediction_card(&mut columns[2], &view.prediction, view.ui_state, palette) {
                actions.push(UiAction::TryAgain);
            }
        });
    });

    if let Some(notice) = &view.notice {
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(&notice.message).color(palette.error_text));
                ui.label(
                    egui::RichText::new(format!("{} error", notice.kind.label()))
                        .small()
                        .color(palette.hint_text),
                );
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    actions.push(UiAction::DismissNotice);
                }
            });
    }

    actions
}

/// The drop target. Returns `true` when the area or its button was clicked.
fn upload_area(ui: &mut egui::Ui, view: &ViewState, chrome: &Chrome<'_>) -> bool {
    let palette = chrome.palette;
    let fill = if chrome.drag_hover {
        palette.drop_hover
    } else {
        palette.pane_background
    };
    let mut browse = false;
    let inner = egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, palette.accent))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(16, 18))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Drop an image here or click to browse")
                        .color(palette.body_text),
                );
                if let Some(name) = &view.selected_name {
                    ui.label(egui::RichText::new(name).small().color(palette.hint_text));
                }
                ui.add_space(4.0);
                if ui.button("Browse").clicked() {
                    browse = true;
                }
            });
        });
    let area = inner
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    browse || area.clicked()
}

fn status_panel(ui: &mut egui::Ui, status: &StatusPanel, palette: &Palette) {
    if !status.visible {
        return;
    }
    ui.horizontal(|ui| {
        if status.spinner {
            ui.add(egui::Spinner::new().color(palette.accent));
        }
        ui.label(egui::RichText::new(&status.text).color(palette.body_text));
    });
}

fn image_pane(
    ui: &mut egui::Ui,
    title: &str,
    pane: &ImagePane,
    textures: &HashMap<ImageId, TextureHandle>,
    palette: &Palette,
) {
    pane_frame(palette).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(title).strong().color(palette.title_text));
        ui.add_space(4.0);
        let texture = pane
            .image
            .as_ref()
            .and_then(|pane_image| textures.get(&pane_image.id));
        match texture {
            Some(texture) => {
                let max = egui::vec2(ui.available_width().min(PANE_MAX_SIZE.x), PANE_MAX_SIZE.y);
                let size = fit_size(texture.size_vec2(), max);
                ui.add(egui::Image::new(texture).fit_to_exact_size(size));
            }
            None => {
                ui.label(egui::RichText::new(&pane.placeholder).color(palette.hint_text));
            }
        }
    });
}

/// Returns `true` when "Try again" was clicked.
fn prediction_card(
    ui: &mut egui::Ui,
    card: &PredictionCard,
    ui_state: UiState,
    palette: &Palette,
) -> bool {
    let mut try_again = false;
    pane_frame(palette).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new("Prediction").strong().color(palette.title_text));
        ui.add_space(4.0);
        if card.visible {
            ui.label(
                egui::RichText::new(&card.label)
                    .size(22.0)
                    .strong()
                    .color(palette.accent),
            );
            ui.label(egui::RichText::new(&card.confidence).color(palette.body_text));
        } else {
            ui.label(egui::RichText::new(&card.placeholder).color(palette.hint_text));
            ui.label(egui::RichText::new(&card.placeholder_detail).color(palette.hint_text));
        }
        ui.add_space(8.0);
        let enabled = ui_state == UiState::Resulted;
        if ui.add_enabled(enabled, egui::Button::new("Try again")).clicked() {
            try_again = true;
        }
    });
    try_again
}

fn pane_frame(palette: &Palette) -> egui::Frame {
    egui::Frame::NONE
        .fill(palette.pane_background)
        .stroke(egui::Stroke::new(1.0, palette.pane_stroke))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(12))
}

/// Scales `image` down to fit inside `max`, keeping its aspect ratio. Never
/// scales up.
pub fn fit_size(image: egui::Vec2, max: egui::Vec2) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (max.x / image.x).min(max.y / image.y).min(1.0).max(0.0);
    image * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_size_keeps_small_images_untouched() {
        assert_eq!(
            fit_size(egui::vec2(64.0, 48.0), PANE_MAX_SIZE),
            egui::vec2(64.0, 48.0)
        );
    }

    #[test]
    fn fit_size_scales_by_the_tighter_axis() {
        assert_eq!(
            fit_size(egui::vec2(640.0, 320.0), egui::vec2(320.0, 320.0)),
            egui::vec2(320.0, 160.0)
        );
        assert_eq!(
            fit_size(egui::vec2(100.0, 400.0), egui::vec2(320.0, 200.0)),
            egui::vec2(50.0, 200.0)
        );
    }

    #[test]
    fn fit_size_handles_degenerate_input() {
        assert_eq!(
            fit_size(egui::vec2(0.0, 10.0), PANE_MAX_SIZE),
            egui::Vec2::ZERO
        );
    }
}
