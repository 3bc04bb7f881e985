//! Configuration and wiring for the assist flow

mod config;
mod orchestrator;

pub use config::IntegrationConfig;
pub use orchestrator::{Orchestrator, OrchestratorHandle};
