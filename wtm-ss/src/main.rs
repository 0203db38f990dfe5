//! wtm-ss (Splitsheet Service) - royalty split allocation and validation
//!
//! Hosts splitsheet working copies for the creation form, enforces the
//! split invariants on every edit, and gates submission to the external
//! creation endpoint.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use wtm_common::config::ServiceConfig;
use wtm_ss::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "wtm-ss", about = "Wai'tuMusic splitsheet service")]
struct Args {
    /// Path to a TOML config file (overrides WTM_CONFIG and defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address (overrides the config file)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Wai'tuMusic Splitsheet Service (wtm-ss) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let mut config = ServiceConfig::resolve(args.config.as_deref());
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    info!("Submission endpoint: {}", config.submission_url);
    info!(
        "Accepted issuer prefixes: {}",
        config.issuer.accepted_prefixes.join(", ")
    );
    if !config.enforce_balance {
        info!("100% total check is advisory only");
    }

    let state = AppState::new(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("wtm-ss listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
