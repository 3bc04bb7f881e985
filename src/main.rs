use anyhow::{anyhow, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vista::integration::{IntegrationConfig, Orchestrator};
use vista::ui::VistaApp;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vista=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vista vision assistant");

    let mut config = IntegrationConfig::from_env();

    // Fall back to text-only when the speech model is missing
    if let Err(e) = config.validate() {
        warn!("{}; speech output disabled", e);
        config = config.without_speech();
        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    }

    info!("Assist endpoint: {}", config.assist.endpoint);

    let (orchestrator, handle) = Orchestrator::new(config)?;
    orchestrator.start()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_title("Vista"),
        ..Default::default()
    };

    eframe::run_native(
        "Vista",
        native_options,
        Box::new(|cc| Ok(Box::new(VistaApp::new(cc, handle)))),
    )
    .map_err(|e| anyhow!("Failed to run UI: {}", e))
}
