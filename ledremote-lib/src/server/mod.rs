//! HTTP front door
//!
//! Accepts connections, bounds request bodies and dispatches requests to the
//! controller or to static file serving.

mod config;
mod routes;
mod static_files;

pub use config::*;
pub use routes::*;
pub use static_files::mime_type;
pub use static_files::StaticTarget;

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::controller::Controller;
use crate::error::ServerError;
use crate::status::StatusStore;

/// A bound HTTP server.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use ledremote_lib::server::{Server, ServerConfig};
/// use ledremote_lib::status::FileStore;
///
/// let config = ServerConfig::default();
/// let store = Arc::new(FileStore::new(&config.status_dir));
/// let server = Server::bind(&config, store).await?;
/// server.run().await;
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Arc<Router>,
}

impl Server {
    /// Binds the listener described by `config`.
    pub async fn bind(
        config: &ServerConfig,
        store: Arc<dyn StatusStore>,
    ) -> Result<Self, ServerError> {
        let addr = config.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        let router = Router::new(
            Controller::new(store),
            config.web_root.clone(),
            config.max_body_bytes,
        );

        Ok(Self {
            listener,
            local_addr,
            router: Arc::new(router),
        })
    }

    /// Returns the address the server listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves connections forever.
    pub async fn run(self) {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Serves connections until `cancel` fires. Connections already accepted
    /// finish on their own tasks.
    pub async fn run_until_cancelled(self, cancel: CancellationToken) {
        log::info!("Listening on http://{}", self.local_addr);

        loop {
            let accepted = tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("Server shutting down");
                    return;
                }
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::error!("Accept failed: {}", e);
                    continue;
                }
            };

            let router = self.router.clone();
            tokio::spawn(async move {
                serve_connection(stream, peer, router).await;
            });
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

async fn serve_connection(stream: tokio::net::TcpStream, peer: SocketAddr, router: Arc<Router>) {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let router = router.clone();
        async move { router.handle(req).await }
    });

    // An oversized body fails the service, which closes the connection
    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        log::debug!("Connection from {} ended: {}", peer, e);
    }
}
