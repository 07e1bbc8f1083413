//! Request dispatch

use std::path::Path;
use std::path::PathBuf;

use http_body_util::BodyExt;
use http_body_util::Full;
use http_body_util::LengthLimitError;
use http_body_util::Limited;
use hyper::body::Body;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::header::CONTENT_TYPE;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;

use super::static_files;
use super::static_files::StaticTarget;
use crate::action::Params;
use crate::controller::Controller;
use crate::controller::Outcome;
use crate::error::RequestError;
use crate::status::StatusStore;

/// The control page bundled with the library, served when the web root has
/// no `index.html`.
pub const GUI_HTML: &str = include_str!("gui.html");

/// Shared state of the request handler.
#[derive(Debug, Clone)]
pub struct Router {
    controller: Controller,
    web_root: PathBuf,
    max_body_bytes: usize,
}

impl Router {
    pub fn new(controller: Controller, web_root: impl Into<PathBuf>, max_body_bytes: usize) -> Self {
        Self {
            controller,
            web_root: web_root.into(),
            max_body_bytes,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Handles one request.
    ///
    /// GET `/?query` and POST bodies are interpreted as parameters; other GET
    /// paths are static. An oversized body is an error, which makes hyper drop
    /// the connection without answering.
    pub async fn handle<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>, RequestError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        log::debug!("{} {}", req.method(), req.uri());

        let method = req.method().clone();
        match method {
            Method::GET => {
                let uri = req.uri();
                match uri.query() {
                    Some(query) if uri.path() == "/" => {
                        let params = Params::parse(query.as_bytes());
                        Ok(self.respond(&params).await)
                    }
                    _ => Ok(self.serve_static(uri.path()).await),
                }
            }
            Method::POST => {
                let body = read_body(req.into_body(), self.max_body_bytes).await?;
                let params = Params::parse(&body);
                Ok(self.respond(&params).await)
            }
            _ => Ok(self.gui().await),
        }
    }

    async fn respond(&self, params: &Params) -> Response<Full<Bytes>> {
        match self.controller.handle(params).await {
            Outcome::Ok => text(StatusCode::OK, "ok"),
            Outcome::ServeGui => self.gui().await,
        }
    }

    async fn serve_static(&self, path: &str) -> Response<Full<Bytes>> {
        match static_files::resolve(path, &self.web_root) {
            StaticTarget::Gui => self.gui().await,
            StaticTarget::TestConnection => text(StatusCode::OK, "ok"),
            StaticTarget::Slot(slot) => match self.controller.store().read(slot).await {
                Ok(Some(contents)) => {
                    log::info!("redirected {} to status slot {}", path, slot);
                    with_type(contents.into(), static_files::mime_type(slot.file_name()))
                }
                Ok(None) => {
                    log::warn!("Status slot {} is empty", slot);
                    self.gui().await
                }
                Err(e) => {
                    log::error!("{}", e);
                    self.gui().await
                }
            },
            StaticTarget::File(file) => match read_file(&file).await {
                Some(data) => {
                    with_type(data.into(), static_files::mime_type(&file.to_string_lossy()))
                }
                None => self.gui().await,
            },
        }
    }

    /// The control page: `index.html` from the web root, or the bundled page.
    async fn gui(&self) -> Response<Full<Bytes>> {
        let page = match tokio::fs::read(self.web_root.join("index.html")).await {
            Ok(data) => Bytes::from(data),
            Err(_) => Bytes::from_static(GUI_HTML.as_bytes()),
        };
        with_type(page, "text/html")
    }
}

/// Reads a request body, failing once more than `limit` bytes arrive.
pub async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, RequestError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            log::warn!("Dropping connection: body exceeds {} bytes", limit);
            Err(RequestError::BodyTooLarge { limit })
        }
        Err(e) => Err(RequestError::Body(e)),
    }
}

async fn read_file(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => match tokio::fs::read(path).await {
            Ok(data) => Some(data),
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                None
            }
        },
        Ok(_) => {
            log::error!("Not a file: \"{}\"", path.display());
            None
        }
        Err(e) => {
            log::debug!("Cannot serve {}: {}", path.display(), e);
            None
        }
    }
}

fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = with_type(Bytes::from_static(body.as_bytes()), "text/plain");
    *response.status_mut() = status;
    response
}

fn with_type(body: Bytes, content_type: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
