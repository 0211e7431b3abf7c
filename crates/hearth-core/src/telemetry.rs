use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with an env-filter layer.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hearth=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Telemetry initialized");
    Ok(())
}
