use anyhow::{Context, Result};
use leadsheet::{
    config::Config,
    leads::LeadService,
    server::{self, RateLimiter},
    sheets::{ServiceAccount, SheetsClient},
    webhook::WebhookClient,
};
use reqwest::Client;
use std::{env, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env().context("loading configuration")?;
    info!(
        spreadsheet = %config.spreadsheet_id,
        sheet = %config.sheet_name,
        "starting lead export service"
    );

    // ─── 3) long-lived clients ───────────────────────────────────────
    let http = Client::new();
    let auth = ServiceAccount::new(http.clone(), &config.client_email, &config.private_key)?;
    let store = SheetsClient::new(
        http.clone(),
        auth,
        &config.spreadsheet_id,
        &config.sheet_name,
    );
    let notifier = WebhookClient::new(http, &config.webhook_url);
    let service = LeadService::new(Arc::new(store), Arc::new(notifier));
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window,
    ));

    // ─── 4) serve ────────────────────────────────────────────────────
    let routes = server::routes(service, limiter);
    let (addr, serving) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(([0, 0, 0, 0], config.port), async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .with_context(|| format!("binding port {}", config.port))?;

    info!("Server running at http://localhost:{}", addr.port());
    info!("Filter options: GET http://localhost:{}/filter-options", addr.port());
    info!("Download: POST http://localhost:{}/filter-and-download", addr.port());

    serving.await;
    info!("all done");
    Ok(())
}
