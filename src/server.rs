//! HTTP server and graceful shutdown.
//!
//! The server is the transport around the chains: it turns each hyper
//! request into a [`Context`], finds the chain for it, runs the chain under a
//! deadline and writes back whatever response the chain left in the context.
//!
//! # Graceful shutdown
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops `listener.accept()` immediately.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::context::Context;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Lookup, Router};

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Configures the server to bind to `addr` with default timeouts.
    ///
    /// ```rust,no_run
    /// use strata::Server;
    /// let server = Server::bind("localhost:8080");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self::with_config(ServerConfig::new(addr))
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections and returns.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `signal` resolves.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.config.addr)
            .await
            .map_err(|source| Error::Bind { addr: self.config.addr.clone(), source })?;
        self.serve_on(listener, router, signal).await
    }

    /// Serves on an already bound listener. The configured address is
    /// ignored.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let router = Arc::new(router);
        let header_read_timeout = self.config.header_read_timeout;
        let handler_timeout = self.config.handler_timeout;

        info!(addr = %listener.local_addr()?, "strata listening");

        // Every connection task, so shutdown can wait for them.
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting at once,
                // even with connections queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req, remote_addr, handler_timeout).await }
                        });

                        let mut conn = ConnBuilder::new(TokioExecutor::new());
                        conn.http1()
                            .timer(TokioTimer::new())
                            .header_read_timeout(header_read_timeout);

                        if let Err(e) = conn.serve_connection(io, svc).await {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the set stays bounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("strata stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request, runs its chain and produces one response.
///
/// Every failure becomes a status code, so hyper never sees an error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
    handler_timeout: Duration,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(peer = %remote_addr, "failed to read request body: {e}");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_inner());
        }
    };
    let mut request = Request::from_parts(parts, body, remote_addr);

    let response = match router.lookup(request.method(), request.path()) {
        Lookup::Found(chain, params) => {
            request.params = params;
            let target = request.target().to_owned();
            match tokio::time::timeout(handler_timeout, chain.call(Context::new(request))).await {
                Ok(cx) => cx.into_response(),
                Err(_) => {
                    warn!(uri = %target, timeout = ?handler_timeout, "handler timed out");
                    Response::status(StatusCode::SERVICE_UNAVAILABLE)
                }
            }
        }
        Lookup::MethodNotAllowed(allowed) => {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header("allow", allow)
                .no_body()
        }
        Lookup::NotFound => Response::status(StatusCode::NOT_FOUND),
    };

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT. On Windows only Ctrl-C exists.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
