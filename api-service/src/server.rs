use anyhow::Context;
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use user_shared::config::HttpConfig;

/// Serves the router on a plain TCP listener until SIGINT or SIGTERM
///
/// In-flight requests get `shutdown_duration` to drain after the signal; the
/// server is abandoned once that passes.
pub async fn serve(app: Router, config: &HttpConfig) -> anyhow::Result<()> {
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("[in server::serve]: failed to bind {}", address))?;
    info!("API listening on {}", address);

    let draining = Arc::new(Notify::new());
    let signalled = Arc::clone(&draining);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            signalled.notify_one();
        })
        .into_future();

    let grace = config.shutdown_duration;
    let forced = async {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.context("[in server::serve]: server error")?;
            info!("Server stopped");
        }
        _ = forced => {
            warn!("Graceful shutdown timed out after {:?}, forcing exit", grace);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
