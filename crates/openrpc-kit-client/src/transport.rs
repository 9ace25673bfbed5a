use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use openrpc_kit_protocol::HttpMethod;
use serde_json::Value;

use crate::error::TransportError;

/// One outbound HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub http_method: HttpMethod,
    pub url: String,
    pub body: Value,
}

/// Moves JSON envelopes to a service and back.
///
/// `Ok(None)` means the server answered without a body, which is what a
/// notification gets.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Option<Value>, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Option<Value>, TransportError>> + Send {
        T::send(self, request)
    }
}

/// Run `send` under `timeout`.
pub(crate) async fn send_with_timeout<T: Transport>(
    transport: &T,
    request: TransportRequest,
    timeout: Duration,
) -> Result<Option<Value>, TransportError> {
    tokio::time::timeout(timeout, transport.send(request))
        .await
        .map_err(|_| TransportError::Timeout(timeout))?
}
