//! egui user interface for Vista

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::VistaApp;
pub use state::{AppState, RequestState};
pub use theme::Theme;
