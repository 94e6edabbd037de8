use anyhow::Result;
use dsmr_notifier::{api, config, state, telemetry};
use config::Config;
use state::AppState;
use telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    if cfg.auth.token.is_empty() || cfg.auth.token.starts_with("__SET_VIA_ENV") {
        anyhow::bail!(
            "SECURITY ERROR: DSMR__AUTH__TOKEN environment variable must be set to a secure random token. \
            Generate one with: openssl rand -base64 32"
        );
    }

    let app_state = AppState::new(cfg.clone()).await?;
    let db = app_state.db.clone();

    let app = api::router(app_state, &cfg);
    let addr = cfg.server.socket_addr()?;

    info!(
        %addr,
        timezone = %cfg.notification.timezone,
        "starting DSMR notifier"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    db.close().await;
    info!("shutdown complete");
    Ok(())
}
