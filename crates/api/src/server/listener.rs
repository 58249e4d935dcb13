//! Accept loops for plain HTTP and HTTPS.
//!
//! Both loops stop accepting once the shared [`CancellationToken`] is
//! cancelled and then let open connections finish, bounded by a grace period.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
    service::TowerToHyperService,
};
use rustls::ServerConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, warn};

/// Pause after a failed `accept()` so persistent errors such as `EMFILE`
/// do not spin the loop.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Serve `router` over plain HTTP until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server fails, or if in-flight requests do not
/// drain within `grace`.
pub async fn serve_http(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let signal = shutdown.clone();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move { signal.cancelled().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => return res.context("HTTP server failed"),
        () = shutdown.cancelled() => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(res) => res.context("HTTP server failed"),
        Err(_) => anyhow::bail!("in-flight requests did not finish within {grace:?}"),
    }
}

/// Serve `router` over TLS until `shutdown` is cancelled.
///
/// Each accepted socket completes its handshake and is then served by
/// hyper's HTTP/1 + HTTP/2 auto-detecting connection builder on its own task.
/// Handshake and connection errors are logged and never stop the loop.
///
/// # Errors
///
/// Returns an error if open connections do not finish within `grace` after
/// shutdown is requested.
pub async fn serve_https(
    listener: TcpListener,
    router: Router,
    tls: Arc<ServerConfig>,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let acceptor = TlsAcceptor::from(tls);
    let tracker = TaskTracker::new();

    loop {
        let (tcp, peer_addr) = tokio::select! {
            res = listener.accept() => match res {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "accept error");
                    tokio::select! {
                        () = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => continue,
                        () = shutdown.cancelled() => break,
                    }
                }
            },
            () = shutdown.cancelled() => break,
        };
        debug!(%peer_addr, "accepted TCP connection");

        tracker.spawn(serve_tls_connection(
            tcp,
            acceptor.clone(),
            router.clone(),
            shutdown.clone(),
        ));
    }

    tracker.close();
    info!(open_connections = tracker.len(), "draining TLS connections");
    tokio::time::timeout(grace, tracker.wait())
        .await
        .map_err(|_| anyhow::anyhow!("TLS connections did not finish within {grace:?}"))
}

async fn serve_tls_connection(
    tcp: TcpStream,
    acceptor: TlsAcceptor,
    router: Router,
    shutdown: CancellationToken,
) {
    let peer_addr = tcp.peer_addr().ok();
    let stream = match acceptor.accept(tcp).await {
        Ok(s) => s,
        Err(e) => {
            debug!(?peer_addr, error = %e, "TLS handshake failed");
            return;
        }
    };

    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), TowerToHyperService::new(router));
    tokio::pin!(conn);

    let res = tokio::select! {
        res = conn.as_mut() => res,
        () = shutdown.cancelled() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };
    if let Err(e) = res {
        warn!(?peer_addr, error = %e, "connection error");
    }
}
