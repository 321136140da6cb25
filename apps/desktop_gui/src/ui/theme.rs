//! Colors and egui visuals for the prediction window.

use eframe::egui;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    // Backgrounds:
    pub app_background: egui::Color32,
    pub panel_background: egui::Color32,
    pub pane_background: egui::Color32,
    pub drop_hover: egui::Color32,

    // Text:
    pub title_text: egui::Color32,
    pub body_text: egui::Color32,
    pub hint_text: egui::Color32,
    pub error_text: egui::Color32,

    // Accent:
    pub accent: egui::Color32,
    pub pane_stroke: egui::Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            app_background: egui::Color32::from_rgb(26, 26, 30),
            panel_background: egui::Color32::from_rgb(18, 18, 20),
            pane_background: egui::Color32::from_rgb(36, 36, 40),
            drop_hover: egui::Color32::from_rgb(44, 58, 60),
            title_text: egui::Color32::from_rgb(251, 251, 251),
            body_text: egui::Color32::from_rgb(239, 239, 241),
            hint_text: egui::Color32::from_rgb(129, 130, 138),
            error_text: egui::Color32::from_rgb(237, 66, 69),
            accent: egui::Color32::from_rgb(110, 169, 174),
            pane_stroke: egui::Color32::from_rgb(48, 48, 56),
        }
    }
}

const CORNER_RADIUS: u8 = 8;

pub fn visuals(palette: &Palette) -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(palette.body_text);
    visuals.window_fill = palette.panel_background;
    visuals.panel_fill = palette.app_background;
    visuals.extreme_bg_color = palette.pane_background;
    visuals.faint_bg_color = palette.pane_background;
    visuals.hyperlink_color = palette.accent;
    visuals.selection.bg_fill = palette.accent;
    visuals.window_corner_radius = egui::CornerRadius::same(CORNER_RADIUS);
    visuals.menu_corner_radius = egui::CornerRadius::same(CORNER_RADIUS);
    visuals.window_stroke = egui::Stroke::new(1.0, palette.pane_stroke);

    visuals.widgets.inactive.bg_fill = palette.accent.gamma_multiply(0.8);
    visuals.widgets.inactive.weak_bg_fill = palette.accent.gamma_multiply(0.8);
    visuals.widgets.hovered.bg_fill = palette.accent.gamma_multiply(0.95);
    visuals.widgets.hovered.weak_bg_fill = palette.accent.gamma_multiply(0.95);
    visuals.widgets.active.bg_fill = palette.accent;
    visuals.widgets.active.weak_bg_fill = palette.accent;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, palette.accent);
    visuals
}

pub fn apply(ctx: &egui::Context, palette: &Palette) {
    let mut style = (*ctx.style()).clone();
    style.visuals = visuals(palette);
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.interact_size = egui::vec2(40.0, 30.0);
    ctx.set_style(style);
}
