mod debug_panel;
mod insight_panel;
mod mode_bar;

pub use debug_panel::DebugPanel;
pub use insight_panel::InsightPanel;
pub use mode_bar::ModeBar;
