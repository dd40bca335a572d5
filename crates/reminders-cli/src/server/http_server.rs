//! Binds the listener and serves the router until shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::ServerConfig;
use crate::server::lifecycle::log_error;
use crate::server::{ServerError, ServerResult, serve_with_shutdown, shutdown_signal};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Serves `app` over plain HTTP.
///
/// After a shutdown signal, in-flight requests get `shutdown_timeout` to
/// finish before the server stops waiting for them.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = server_config.validate() {
        let error = ServerError::invalid_config(&validation_error);
        log_error(&error);
        return Err(error);
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        let error = ServerError::bind_error(server_addr, err);
        log_error(&error);
        error
    })?;

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Successfully bound to address"
    );

    let shutdown_timeout = server_config.shutdown_timeout();
    serve_with_shutdown(&server_config, || async move {
        serve_until_drained(listener, app, shutdown_timeout).await
    })
    .await
}

async fn serve_until_drained(
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
) -> ServerResult<()> {
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();

    let shutdown = async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    };

    let serve = async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Runtime)
    };

    let drain_deadline = async move {
        if signalled_rx.await.is_err() {
            std::future::pending::<()>().await;
        }

        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            timeout_secs = shutdown_timeout.as_secs(),
            "Waiting for in-flight requests"
        );
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = serve => result,
        () = drain_deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                "Shutdown timeout elapsed, dropping remaining connections"
            );
            Ok(())
        }
    }
}
