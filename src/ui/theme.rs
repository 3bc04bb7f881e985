//! Visual styling for the Vista UI
//!
//! The palette is tuned for low-vision users: near-black backgrounds, high
//! contrast text, and type sizes a step larger than egui defaults.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Success color (green)
    pub success: Color32,
    /// Warning color (yellow/orange)
    pub warning: Color32,
    /// Error color (red)
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// High-contrast dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(56, 189, 248),  // Sky blue
            success: Color32::from_rgb(74, 222, 128),  // Green
            warning: Color32::from_rgb(250, 204, 21),  // Amber
            error: Color32::from_rgb(248, 113, 113),   // Red

            bg_primary: Color32::from_rgb(9, 12, 18),
            bg_secondary: Color32::from_rgb(22, 28, 40),
            bg_tertiary: Color32::from_rgb(42, 52, 70),

            text_primary: Color32::from_rgb(250, 250, 250),
            text_secondary: Color32::from_rgb(214, 219, 228),
            text_muted: Color32::from_rgb(148, 158, 175),

            button_rounding: Rounding::same(10.0),
            card_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.7);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, self.text_primary);
        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.5, self.text_primary);

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);
        ctx.set_fonts(egui::FontDefinitions::default());

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        // One step larger than egui defaults throughout
        let text_styles = [
            (TextStyle::Heading, 26.0, FontFamily::Proportional),
            (TextStyle::Body, 16.0, FontFamily::Proportional),
            (TextStyle::Button, 16.0, FontFamily::Proportional),
            (TextStyle::Small, 13.0, FontFamily::Proportional),
            (TextStyle::Monospace, 13.0, FontFamily::Monospace),
        ];
        for (text_style, size, family) in text_styles {
            style
                .text_styles
                .insert(text_style, FontId::new(size, family));
        }

        ctx.set_style(style);
    }
}
