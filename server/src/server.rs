//! Listener lifecycle: starting, serving, draining, stopped.
//!
//! Connections are served over HTTP/1.1 with `hyper`, one task per
//! connection. When the shutdown future resolves the listener is dropped, so
//! new connections are refused, and every open connection is asked to finish
//! its current request and close. Connections still open once the drain
//! timeout elapses are aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;

/// How long in-flight requests get to finish after a shutdown signal.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a connection may take to send request headers. This also bounds
/// how long an idle keep-alive connection is held open.
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    drain_timeout: Duration,
}

impl Server {
    /// Binds the listening socket. Accepting starts in [`Server::serve`].
    pub async fn bind(addr: SocketAddr) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "starting");
        Ok(Self::from_listener(listener))
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self {
            listener,
            drain_timeout: DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves `router` until `shutdown` resolves, then drains.
    ///
    /// Returns once every connection has closed or been aborted.
    pub async fn serve<F>(self, router: Router, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = self.local_addr()?;
        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(READ_TIMEOUT)
            .keep_alive(true);

        let graceful = GracefulShutdown::new();
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        info!(%addr, "serving");
        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!(in_flight = connections.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            // Back off so a persistent failure such as EMFILE
                            // does not spin.
                            error!("accept error: {e}");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };
                    let service = TowerToHyperService::new(router.clone());
                    let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));
                    connections.spawn(async move {
                        if let Err(e) = conn.await {
                            debug!(%peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connections so the set does not grow unbounded.
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        drop(self.listener);
        match tokio::time::timeout(self.drain_timeout, graceful.shutdown()).await {
            Ok(()) => info!("all connections drained"),
            Err(_) => warn!(
                remaining = connections.len(),
                timeout_ms = self.drain_timeout.as_millis() as u64,
                "drain timeout elapsed, closing remaining connections"
            ),
        }
        connections.abort_all();
        while connections.join_next().await.is_some() {}

        info!("stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
