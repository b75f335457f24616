use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use wolconsole::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let pool = db::connect(&app_config.database.path, app_config.database.max_pool_size).await?;
    db::init(&pool).await?;

    let state = routes::AppState::new(
        pool,
        Arc::new(interfaces::SysinfoInterfaces::new()),
        Arc::new(wol::UdpMagicPacketSender::new(&app_config.wol)),
        app_config.clone(),
    );
    bootstrap::seed_admin(&state.users, app_config.auth.bootstrap_admin.as_ref()).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let sweeper_handle = session_sweeper::spawn(
        state.sessions.clone(),
        app_config.auth.sweep_interval_secs,
        shutdown_rx,
    );

    let app = routes::app(state);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Listening on http://{} (WoL target {}:{}, unresolved interfaces: {:?})",
        addr,
        app_config.wol.broadcast_address,
        app_config.wol.port,
        app_config.wol.unresolved_interface
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(
                    tokio::signal::unix::SignalKind::terminate(),
                ) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = shutdown_tx.send(());
    let _ = sweeper_handle.await;
    Ok(())
}
