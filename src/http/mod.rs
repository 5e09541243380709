//! The HTTP server, handler and routes.
//!
//! This file itself contains fairly little logic and just sets up the `hyper`
//! server and catches panics. The main logic is in `handlers.rs`.

use bytes::Bytes;
use futures::FutureExt;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use std::{
    convert::Infallible,
    future::Future,
    net::{IpAddr, SocketAddr},
    panic::AssertUnwindSafe,
    sync::Arc,
};
use tokio::net::TcpListener;

use crate::{api, data::SampleData, prelude::*};
use self::handlers::handle;


mod handlers;
mod response;

#[cfg(test)]
mod tests;


/// HTTP server configuration.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct HttpConfig {
    /// The TCP port the HTTP server should listen on.
    #[config(default = 4000)]
    pub(crate) port: u16,

    /// The bind address to listen on.
    #[config(default = "127.0.0.1")]
    pub(crate) address: IpAddr,

    /// Whether to serve the interactive GraphiQL IDE at `/graphiql`.
    #[config(default = true)]
    pub(crate) graphiql: bool,
}


// Our responses always have a fully buffered body.
type Response<T = Full<Bytes>> = hyper::Response<T>;
type Request<T = hyper::body::Incoming> = hyper::Request<T>;


/// Context that the request handler has access to.
struct Context {
    api_root: Arc<api::RootNode>,
    data: Arc<SampleData>,
    config: HttpConfig,
}


/// Starts the HTTP server. The future returned by this function must be awaited
/// to actually run it. It resolves once a shutdown signal (ctrl+c) was
/// received.
pub(crate) async fn serve(
    config: &HttpConfig,
    api_root: api::RootNode,
    data: Arc<SampleData>,
) -> Result<()> {
    let ctx = Arc::new(Context {
        api_root: Arc::new(api_root),
        data,
        config: config.clone(),
    });

    let addr = SocketAddr::new(config.address, config.port);
    let listener = TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);
    if config.graphiql {
        info!("GraphiQL available at http://{}/graphiql", listener.local_addr()?);
    }

    accept_connections(listener, ctx, tokio::signal::ctrl_c()).await
}

/// Accepts connections on `listener` until `shutdown` resolves. Each
/// connection is served on its own task.
async fn accept_connections(
    listener: TcpListener,
    ctx: Arc<Context>,
    shutdown: impl Future<Output = std::io::Result<()>>,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to accept TCP connection: {e}");
                    continue;
                }
            },
            res = &mut shutdown => {
                res.context("failed to listen for shutdown signal")?;
                info!("Received shutdown signal, stopping HTTP server");
                return Ok(());
            }
        };
        trace!("Accepted connection from {peer}");

        // The service is just a thin closure passing the shared context to
        // `handle`.
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                handle_internal_errors(handle(req, Arc::clone(&ctx)))
            });

            let builder = auto::Builder::new(TokioExecutor::new());
            if let Err(e) = builder.serve_connection(TokioIo::new(stream), service).await {
                debug!("Error serving connection from {peer}: {e}");
            }
        });
    }
}

/// This just wraps another future and catches all panics that might occur when
/// resolving/polling that given future. This ensures that we always answer with
/// `500` instead of just crashing the task and closing the connection.
async fn handle_internal_errors(
    future: impl Future<Output = Response>,
) -> Result<Response, Infallible> {
    // The `AssertUnwindSafe` is necessary: we are saying that if the future
    // panics, the remaining application state is not broken. That is true as
    // all shared state is immutable.
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(response) => Ok(response),
        Err(panic) => {
            // For most panics (which use `panic!` like `println!`), the
            // payload is either `&str` or `String`.
            let msg = panic.downcast_ref::<String>()
                .map(|s| s.as_str())
                .or(panic.downcast_ref::<&str>().copied());

            match msg {
                Some(msg) => error!("INTERNAL SERVER ERROR: HTTP handler panicked: '{}'", msg),
                None => error!("INTERNAL SERVER ERROR: HTTP handler panicked"),
            }

            Ok(response::internal_server_error())
        }
    }
}
