//! USD High-Impact Monitor — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the fetch pipeline, shared cache,
//! and middleware.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use usd_impact_monitor::api::{self, AppState};
use usd_impact_monitor::config::DashboardConfig;
use usd_impact_monitor::credentials::Credential;
use usd_impact_monitor::fetch::RapidApiClient;
use usd_impact_monitor::metrics::Metrics;
use usd_impact_monitor::pipeline::PipelineContext;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - DASHBOARD_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("DASHBOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("usd_impact_monitor=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This is what
    // surfaces RAPIDAPI_KEY and DASHBOARD_CONFIG_PATH locally.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = DashboardConfig::load_default().expect("Failed to load dashboard config");

    // Resolved once; Absent is a supported state that pins every section to
    // demo data for the lifetime of the process.
    let credential = Credential::resolve();
    if credential.is_absent() {
        tracing::warn!("no RAPIDAPI_KEY configured; serving demo data only");
    }

    let client = RapidApiClient::new(config.timezone.clone(), config.time_format.clone())
        .expect("Failed to build upstream HTTP client");

    let ctx = PipelineContext::new(credential, config, Arc::new(client));
    let metrics = Metrics::init();

    let router = api::create_router(AppState { ctx: Arc::new(ctx) }).merge(metrics.router());

    Ok(router.into())
}
