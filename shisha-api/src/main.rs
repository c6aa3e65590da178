//! shisha-api - Hookah lounge mini-app backend
//!
//! REST API over the mix engine plus the brand/flavor catalog. Serves the
//! Telegram mini-app client; order notifications go out through the bot
//! when one is configured.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use shisha_api::{build_router, notify::OrderNotifier, AppState, RuntimeSettings};
use shisha_common::{config, db};

#[derive(Debug, Parser)]
#[command(name = "shisha-api", about = "Hookah lounge mini-app backend")]
struct Args {
    /// Data root folder (falls back to SHISHA_ROOT, config.toml, then the
    /// platform data directory)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, env = "SHISHA_PORT", default_value_t = 3000)]
    port: u16,

    /// Populate the brand/flavor catalog with seed data and continue
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting shisha-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref())?;
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path).await?;

    if args.seed {
        db::seed_catalog(&pool).await?;
    }

    let settings = RuntimeSettings::load(&pool).await?;
    info!(
        "Settings loaded (onboarding: {}, order notifications: {})",
        settings.onboarding_enabled, settings.order_notifications_enabled
    );

    let notifier = OrderNotifier::from_env().map(Arc::new);
    if notifier.is_some() {
        info!("✓ Telegram order notifier configured");
    } else {
        info!("No bot token configured, order notifications disabled");
    }

    let state = AppState::new(pool, settings, notifier);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("shisha-api listening on http://0.0.0.0:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
