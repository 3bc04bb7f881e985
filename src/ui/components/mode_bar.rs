//! Mode bar component
//!
//! Provides the three assistance-mode buttons, the image attachment control,
//! and the speech toggle.

use crate::assist::AssistMode;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

/// Mode bar component for selecting an assistance mode
pub struct ModeBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ModeBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for mode in AssistMode::ALL {
                        self.show_mode_button(ui, mode);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.show_speech_toggle(ui);
                        ui.add_space(self.theme.spacing_sm);
                        self.show_attachment_control(ui);

                        if self.state.request_state.is_pending() {
                            ui.add_space(self.theme.spacing_sm);
                            ui.add(egui::Spinner::new().color(self.theme.warning));
                        }
                    });
                });
            });
    }

    fn show_mode_button(&mut self, ui: &mut egui::Ui, mode: AssistMode) {
        let enabled = !self.state.request_state.is_pending();

        let button = egui::Button::new(
            RichText::new(format!("{} {}", mode.icon(), mode.label()))
                .size(15.0)
                .color(self.theme.text_primary),
        )
        .min_size(Vec2::new(0.0, 40.0))
        .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, mode.label())
        });

        if response.clicked() {
            self.state.request_description(mode);
        }
    }

    fn show_attachment_control(&mut self, ui: &mut egui::Ui) {
        if let Some(image) = &self.state.attached_image {
            let file_name = image.file_name.clone();

            let clear = ui.small_button("✕");
            clear.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Remove attached image")
            });
            if clear.clicked() {
                self.state.clear_attachment();
            }

            ui.label(
                RichText::new(file_name)
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
        } else {
            let button = egui::Button::new(
                RichText::new("🖼 Attach Image")
                    .size(13.0)
                    .color(self.theme.text_secondary),
            )
            .rounding(self.theme.button_rounding);

            let response = ui.add(button);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Attach image")
            });

            if response.clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp"])
                    .pick_file()
                {
                    self.state.attach_image(&path);
                }
            }
        }
    }

    fn show_speech_toggle(&mut self, ui: &mut egui::Ui) {
        let (icon, tooltip, color) = if self.state.speech_enabled {
            ("🔊", "Speech on", self.theme.success)
        } else {
            ("🔇", "Speech off", self.theme.text_muted)
        };

        let button = egui::Button::new(RichText::new(icon).size(16.0).color(color))
            .min_size(Vec2::splat(36.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add(button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Toggle speech")
        });

        if response.clicked() {
            self.state.toggle_speech();
        }

        response.on_hover_text(tooltip);
    }
}
