use anyhow::Result;
use esg_insights::{
    api,
    config::{ServiceConfig, DEFAULT_LOG_LEVEL},
    data,
};
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();
    info!("startup");

    let cfg = ServiceConfig::from_env();
    let addr = cfg.socket_addr()?;

    // ─── 2) load the table once, before accepting traffic ───────────
    let data_path = data::default_data_path();
    let table = tokio::task::spawn_blocking({
        let data_path = data_path.clone();
        move || data::load_table(&data_path)
    })
    .await?;
    info!(
        path = %data_path.display(),
        rows = table.len(),
        source = table.source().as_str(),
        "table ready"
    );

    // ─── 3) serve ────────────────────────────────────────────────────
    let routes = api::routes(table, &cfg.cors_origins);
    let (bound, server) =
        warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })?;

    info!("listening on http://{}", bound);
    info!(origins = ?cfg.cors_origins, "CORS allow-list");
    server.await;

    info!("all done");
    Ok(())
}
