//! Insight panel component
//!
//! Shows the current description (or error) and the session history.

use crate::messages::{MessageContent, Sender};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Central panel showing the latest description and past interactions
pub struct InsightPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> InsightPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            self.show_insight(ui);
            ui.add_space(self.theme.spacing);
            self.show_history(ui);
        });
    }

    fn show_insight(&self, ui: &mut egui::Ui) {
        let color = if self.state.insight_is_error {
            self.theme.error
        } else if self.state.request_state.is_pending() {
            self.theme.warning
        } else {
            self.theme.text_primary
        };

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_min_height(72.0);
                let label = ui.label(
                    RichText::new(&self.state.insight_text)
                        .size(16.0)
                        .color(color),
                );
                let insight = self.state.insight_text.clone();
                label.widget_info(move || {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Label,
                        true,
                        &format!("Insight: {}", insight),
                    )
                });
            });
    }

    fn show_history(&self, ui: &mut egui::Ui) {
        let messages = self.state.messages.get_all();
        if messages.is_empty() {
            return;
        }

        ui.label(
            RichText::new("History")
                .size(12.0)
                .strong()
                .color(self.theme.text_secondary),
        );

        ScrollArea::vertical()
            .id_salt("insight_history")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &messages {
                    match (&message.sender, &message.content) {
                        (Sender::User, MessageContent::Text(text)) => {
                            let label = ui.label(
                                RichText::new(format!("▸ {}", text))
                                    .size(12.0)
                                    .color(self.theme.text_muted),
                            );
                            let accessible = format!("Mode request: {}", text);
                            label.widget_info(move || {
                                egui::WidgetInfo::labeled(
                                    egui::WidgetType::Label,
                                    true,
                                    &accessible,
                                )
                            });
                        }
                        (Sender::Assistant, MessageContent::Text(text)) => {
                            let timing = message
                                .metadata
                                .processing_time_ms
                                .map(|ms| format!(" · {}ms", ms))
                                .unwrap_or_default();
                            let spoken = if message.metadata.spoken { " · 🔊" } else { "" };

                            let label = ui.label(
                                RichText::new(format!("{}{}{}", text, timing, spoken))
                                    .size(13.0)
                                    .color(self.theme.text_secondary),
                            );
                            let accessible = format!("Description: {}", text);
                            label.widget_info(move || {
                                egui::WidgetInfo::labeled(
                                    egui::WidgetType::Label,
                                    true,
                                    &accessible,
                                )
                            });
                        }
                        (_, MessageContent::Image(image)) => {
                            ui.label(
                                RichText::new(format!("🖼 {}", image.file_name))
                                    .size(12.0)
                                    .color(self.theme.text_muted),
                            );
                        }
                    }
                    ui.add_space(self.theme.spacing_sm / 2.0);
                }
            });
    }
}
