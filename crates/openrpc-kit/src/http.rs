//! HTTP front end for a [`Router`], built on axum.
//!
//! Every request is handed to the router with its verb, path and raw body.
//! Replies are JSON, notifications answer `202 Accepted` with no body and
//! unknown paths answer `404`.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use openrpc_kit::http::HttpService;
//! # use openrpc_kit::protocol::Server;
//! # use openrpc_kit::registry::{Registry, Router};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::new(Server::new("http://127.0.0.1:3000/api"), None);
//! let app = HttpService::new(Router::new(Arc::new(registry))?)
//!     .prefix("/api")
//!     .into_router();
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use openrpc_kit_protocol::HttpMethod;
use openrpc_kit_registry::{CallContext, Dispatch, Router};
use serde_json::Value;
use tracing::debug;

type ContextFn = dyn Fn(&HeaderMap) -> CallContext + Send + Sync;

/// Serves a [`Router`] under zero or more path prefixes.
#[derive(Clone)]
pub struct HttpService {
    router: Arc<Router>,
    prefixes: Vec<String>,
    context: Arc<ContextFn>,
}

impl HttpService {
    pub fn new(router: Router) -> Self {
        Self::shared(Arc::new(router))
    }

    pub fn shared(router: Arc<Router>) -> Self {
        Self {
            router,
            prefixes: Vec::new(),
            context: Arc::new(|_: &HeaderMap| CallContext::anonymous()),
        }
    }

    /// Mount under `prefix` (e.g. `/api`). With no prefix the router is
    /// served at the root.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Derive the caller's roles from request headers.
    ///
    /// Defaults to [`CallContext::anonymous`].
    pub fn with_context<F>(mut self, context: F) -> Self
    where
        F: Fn(&HeaderMap) -> CallContext + Send + Sync + 'static,
    {
        self.context = Arc::new(context);
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn into_router(self) -> axum::Router {
        axum::Router::new().fallback(serve).with_state(self)
    }

    fn dispatch(&self, verb: HttpMethod, path: &str, body: &[u8], ctx: &CallContext) -> Dispatch {
        let body: Value = match serde_json::from_slice(body) {
            Ok(body) => body,
            Err(_) => return self.router.route_bytes(verb, path, body, ctx),
        };

        if self.prefixes.is_empty() {
            return self.router.route(verb, path, &body, ctx);
        }
        self.prefixes
            .iter()
            .map(|prefix| self.router.route_prefixed(prefix, verb, path, &body, ctx))
            .find(|dispatch| !matches!(dispatch, Dispatch::NotFound))
            .unwrap_or(Dispatch::NotFound)
    }
}

impl fmt::Debug for HttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpService")
            .field("router", &self.router)
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

async fn serve(
    State(service): State<HttpService>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let verb = if method == Method::GET {
        HttpMethod::Get
    } else if method == Method::POST {
        HttpMethod::Post
    } else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    debug!(%method, path = uri.path(), bytes = body.len(), "http request");
    let ctx = (service.context)(&headers);
    match service.dispatch(verb, uri.path(), &body, &ctx) {
        Dispatch::Reply(response) => Json(response).into_response(),
        Dispatch::Accepted => StatusCode::ACCEPTED.into_response(),
        Dispatch::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}
