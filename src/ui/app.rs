//! eframe application shell
//!
//! Panel layout: header on top, mode bar on the bottom, insight panel in the
//! center, debug panel on the right when toggled.

use crate::integration::OrchestratorHandle;
use crate::ui::components::{DebugPanel, InsightPanel, ModeBar};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::time::{Duration, Instant};

pub struct VistaApp {
    state: AppState,
    handle: OrchestratorHandle,
    theme: Theme,
    last_frame_time: Instant,
}

impl VistaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, handle: OrchestratorHandle) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let mut state = AppState::new();
        state.connect(&handle);
        state.debug_info.add_log("Vista UI initialized".to_string());

        Self {
            state,
            handle,
            theme,
            last_frame_time: Instant::now(),
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Vista")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Vision Assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔍").on_hover_text("Toggle debug panel").clicked() {
                            self.state.show_debug_panel = !self.state.show_debug_panel;
                        }
                        if ui.button("🗑").on_hover_text("Clear history").clicked() {
                            self.state.clear_log();
                        }
                    });
                });
            });
    }

    fn show_panels(&mut self, ctx: &egui::Context) {
        if self.state.show_debug_panel {
            SidePanel::right("debug_panel")
                .resizable(true)
                .default_width(300.0)
                .min_width(250.0)
                .max_width(500.0)
                .frame(
                    egui::Frame::none()
                        .fill(self.theme.bg_primary)
                        .inner_margin(self.theme.spacing),
                )
                .show(ctx, |ui| {
                    DebugPanel::new(&self.state, &self.theme).show(ui);
                });
        }

        TopBottomPanel::bottom("mode_bar")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ModeBar::new(&mut self.state, &self.theme).show(ui);
            });

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InsightPanel::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for VistaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;
        self.state.update_fps(delta);

        self.state.poll_events();

        self.show_header(ctx);
        self.show_panels(ctx);

        // Poll every frame while a request is in flight; a slow tick is
        // enough otherwise to pick up late TTS audio
        if self.state.request_state.is_pending() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.handle.shutdown();
    }
}
