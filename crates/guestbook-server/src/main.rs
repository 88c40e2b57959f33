use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use guestbook_api::{AppStateInner, GuestbookConfig};
use guestbook_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestbook=debug,tower_http=debug".into()),
        )
        .init();

    let config = GuestbookConfig::from_env()?;

    // A store that fails to open leaves the server up; every page reports it.
    let db = match Database::open(&config.db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            error!("Could not open entry store: {}", e);
            None
        }
    };

    if config.verification_enabled() {
        info!("reCAPTCHA verification enabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let admin_addr = config.admin_addr;
    let page_size = config.page_size;
    let state = AppStateInner::new(config, db)?;

    if let Some(admin_addr) = admin_addr {
        if !admin_addr.ip().is_loopback() {
            warn!("Admin listener on non-loopback address {}; it has no authentication", admin_addr);
        }
        let admin = guestbook_api::admin_router(state.clone()).layer(TraceLayer::new_for_http());
        let listener = tokio::net::TcpListener::bind(admin_addr).await?;
        info!("Guestbook admin listening on {}", admin_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, admin)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                error!("Admin listener stopped: {}", e);
            }
        });
    }

    let app = guestbook_api::router(state).layer(TraceLayer::new_for_http());

    info!("Guestbook listening on {} ({} entries per page)", addr, page_size);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
