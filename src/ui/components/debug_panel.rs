//! Debug side panel
//!
//! Internal pipeline state for development builds: request status, speech
//! queue depth, frame rate, and the recent log tail.

use crate::ui::state::{AppState, RequestState};
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                self.show_header(ui);
                ui.separator();
                self.show_stats(ui);
                self.show_last_error(ui);
                ui.add_space(self.theme.spacing_sm);
                ui.separator();
                self.show_log_tail(ui);
            });
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Debug")
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let fps = self.state.debug_info.fps;
                let color = match fps {
                    f if f >= 55.0 => self.theme.success,
                    f if f >= 30.0 => self.theme.warning,
                    _ => self.theme.error,
                };
                ui.label(
                    RichText::new(format!("{:.1} FPS", fps))
                        .size(12.0)
                        .family(egui::FontFamily::Monospace)
                        .color(color),
                );
            });
        });
    }

    fn show_stats(&self, ui: &mut egui::Ui) {
        let request = match self.state.request_state {
            RequestState::Idle => "Idle".to_string(),
            RequestState::Pending { mode, .. } => format!("Pending ({})", mode),
        };

        let rows = [
            ("Request", request),
            ("Assist", self.state.debug_info.assist_status.clone()),
            (
                "Speech queue",
                self.state.debug_info.speech_queue_status.clone(),
            ),
            ("Entries", self.state.messages.len().to_string()),
            (
                "Speech",
                if self.state.speech_enabled { "on" } else { "off" }.to_string(),
            ),
        ];

        egui::Grid::new("debug_stats")
            .num_columns(2)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                for (name, value) in rows {
                    ui.label(RichText::new(name).size(12.0).color(self.theme.text_muted));
                    ui.label(
                        RichText::new(if value.is_empty() { "—".into() } else { value })
                            .size(12.0)
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_primary),
                    );
                    ui.end_row();
                }
            });
    }

    fn show_last_error(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.state.last_error {
            ui.add_space(self.theme.spacing_sm);
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚠").color(self.theme.error));
                ui.label(RichText::new(error).size(12.0).color(self.theme.error));
            });
        }
    }

    fn show_log_tail(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("Recent logs")
                .size(12.0)
                .strong()
                .color(self.theme.text_secondary),
        );

        ScrollArea::vertical()
            .max_height(120.0)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.state.debug_info.log_messages.is_empty() {
                    ui.label(
                        RichText::new("No log messages")
                            .size(11.0)
                            .color(self.theme.text_muted)
                            .italics(),
                    );
                    return;
                }

                for msg in &self.state.debug_info.log_messages {
                    ui.label(
                        RichText::new(msg)
                            .size(11.0)
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_muted),
                    );
                }
            });
    }
}
