//! Colors for the desktop panel preview.

use eframe::egui::Color32;

/// Panel painting colors
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color32,
    pub panel_fill: Color32,
    pub panel_stroke: Color32,
    pub button_idle: Color32,
    pub button_hovered: Color32,
    pub button_pressed: Color32,
    pub text: Color32,
    pub text_dim: Color32,
    pub accent: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(14, 12, 24),
            panel_fill: Color32::from_rgba_premultiplied(32, 28, 52, 230),
            panel_stroke: Color32::from_rgb(90, 80, 140),
            button_idle: Color32::from_rgb(52, 46, 86),
            button_hovered: Color32::from_rgb(94, 84, 150),
            button_pressed: Color32::from_rgb(140, 126, 210),
            text: Color32::from_rgb(235, 232, 250),
            text_dim: Color32::from_rgb(160, 155, 185),
            accent: Color32::from_rgb(236, 64, 122),
        }
    }
}

impl Theme {
    /// Theme tinted with a room's accent color.
    pub fn with_accent(accent: [u8; 3]) -> Self {
        Self {
            accent: Color32::from_rgb(accent[0], accent[1], accent[2]),
            ..Self::default()
        }
    }
}
