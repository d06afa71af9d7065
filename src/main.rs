use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use digitscan::config::{Args, Config};
use digitscan::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args(args)?;

    tracing::info!("Starting digitscan-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Default profile: {} (min_area={}, confidence_floor={:.2})",
        config.preset.as_str(),
        config.profile.min_area,
        config.profile.confidence_floor
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
