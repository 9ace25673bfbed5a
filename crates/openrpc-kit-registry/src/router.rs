//! Transport-agnostic request routing.
//!
//! A listener hands each inbound `(verb, path, body)` to [`Router::route`]
//! and writes back whatever [`Dispatch`] says. All envelope validation,
//! discovery, authorization and error shaping happens here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use openrpc_kit_protocol::{ErrorObject, Response, Role, DISCOVER_METHOD};
use serde_json::Value;
use tracing::{debug, warn};

use crate::contract::{Contract, HttpMethod};
use crate::discovery::{self, request_id};
use crate::error::{RegistryError, Result};
use crate::method::{MethodDefinition, MethodKind};
use crate::registry::Registry;

/// Who is calling. Filled in by the listener from its own auth layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    pub roles: Vec<Role>,
    pub principal: Option<String>,
}

impl CallContext {
    /// A caller holding no roles.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            principal: None,
        }
    }

    pub fn principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }
}

/// What a handler returns.
pub type HandlerResult = std::result::Result<Value, ErrorObject>;

/// Business logic behind one method.
///
/// Receives `params` (`null` when absent). An `Err` is sent back verbatim as
/// the response `error`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, params: Value, ctx: &CallContext) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(Value, &CallContext) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, params: Value, ctx: &CallContext) -> HandlerResult {
        self(params, ctx)
    }
}

/// Decides whether a caller may invoke a method.
pub trait Authorizer: Send + Sync + 'static {
    fn authorize(&self, method: &MethodDefinition, ctx: &CallContext) -> bool;
}

/// Grants access when the caller holds any of the method's roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl Authorizer for RoleAuthorizer {
    fn authorize(&self, method: &MethodDefinition, ctx: &CallContext) -> bool {
        method.permissions.allows(&ctx.roles)
    }
}

/// What the listener should send back.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Write this Response as the body.
    Reply(Response),
    /// Notification handled; reply without a body (202).
    Accepted,
    /// No route (404).
    NotFound,
}

impl Dispatch {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Dispatch::Reply(response) => Some(response),
            _ => None,
        }
    }
}

pub struct Router {
    registry: Arc<Registry>,
    contracts: HashMap<String, Contract>,
    handlers: HashMap<String, Arc<dyn Handler>>,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl Router {
    /// Build a router over a finished registry.
    ///
    /// Every method contract is compiled up front.
    pub fn new(registry: Arc<Registry>) -> Result<Self> {
        let contracts = registry
            .methods()
            .map(|method| Ok((method.name.clone(), method.contract()?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            registry,
            contracts,
            handlers: HashMap::new(),
            authorizer: None,
        })
    }

    /// Attach the handler for a registered method.
    pub fn handler(mut self, name: &str, handler: impl Handler) -> Result<Self> {
        if !self.contracts.contains_key(name) {
            return Err(RegistryError::UnknownMethod(name.to_string()));
        }
        self.handlers.insert(name.to_string(), Arc::new(handler));
        Ok(self)
    }

    /// Enforce method permissions with `authorizer`.
    pub fn with_authorizer(mut self, authorizer: impl Authorizer) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Route a request whose path carries a mount prefix such as `/api`.
    pub fn route_prefixed(
        &self,
        prefix: &str,
        verb: HttpMethod,
        path: &str,
        body: &Value,
        ctx: &CallContext,
    ) -> Dispatch {
        match path.strip_prefix(prefix.trim_end_matches('/')) {
            Some(rest) if rest.starts_with('/') => self.route(verb, rest, body, ctx),
            _ => Dispatch::NotFound,
        }
    }

    /// Route a raw body. Unparseable JSON is answered with a parse error.
    pub fn route_bytes(
        &self,
        verb: HttpMethod,
        path: &str,
        body: &[u8],
        ctx: &CallContext,
    ) -> Dispatch {
        match serde_json::from_slice::<Value>(body) {
            Ok(body) => self.route(verb, path, &body, ctx),
            Err(err) => {
                debug!(path, error = %err, "unparseable request body");
                Dispatch::Reply(Response::failure(None, ErrorObject::parse_error()))
            }
        }
    }

    /// Route one request.
    pub fn route(&self, verb: HttpMethod, path: &str, body: &Value, ctx: &CallContext) -> Dispatch {
        let Some(name) = path.strip_prefix('/') else {
            return Dispatch::NotFound;
        };

        if name == DISCOVER_METHOD {
            return Dispatch::Reply(discovery::respond(&self.registry, body));
        }
        if verb != HttpMethod::Post {
            return Dispatch::NotFound;
        }

        let (Some(contract), Some(method)) = (self.contracts.get(name), self.registry.method(name))
        else {
            return match request_id(body) {
                Some(id) => {
                    debug!(method = name, "unknown method");
                    Dispatch::Reply(Response::failure(
                        Some(id),
                        ErrorObject::method_not_found(name),
                    ))
                }
                None => Dispatch::NotFound,
            };
        };

        match contract.kind {
            MethodKind::Request => Dispatch::Reply(self.answer(contract, method, body, ctx)),
            MethodKind::Notification => {
                self.accept(contract, method, body, ctx);
                Dispatch::Accepted
            }
        }
    }

    fn answer(
        &self,
        contract: &Contract,
        method: &MethodDefinition,
        body: &Value,
        ctx: &CallContext,
    ) -> Response {
        let id = request_id(body);
        if let Err(err) = contract.validate_input(body) {
            debug!(method = %method.name, error = %err, "request rejected");
            return Response::failure(id, ErrorObject::from_validation(&err));
        }
        let Some(id) = id else {
            return Response::failure(None, ErrorObject::invalid_request());
        };

        if !self.authorized(method, ctx) {
            debug!(method = %method.name, principal = ?ctx.principal, "request forbidden");
            return Response::failure(Some(id), ErrorObject::forbidden());
        }

        let Some(handler) = self.handlers.get(&method.name) else {
            warn!(method = %method.name, "no handler registered");
            return Response::failure(
                Some(id),
                ErrorObject::internal_error().with_data(Value::from("no handler registered")),
            );
        };

        let params = body.get("params").cloned().unwrap_or(Value::Null);
        let response = match handler.call(params, ctx) {
            Ok(result) => Response::success(id.clone(), result),
            Err(error) => return Response::failure(Some(id), error),
        };

        let checked = serde_json::to_value(&response)
            .map_err(|err| err.to_string())
            .and_then(|value| contract.validate_output(&value).map_err(|err| err.to_string()));
        match checked {
            Ok(()) => {
                debug!(method = %method.name, id = %id, "request answered");
                response
            }
            Err(err) => {
                warn!(method = %method.name, error = %err, "handler result violates contract");
                Response::failure(Some(id), ErrorObject::internal_error())
            }
        }
    }

    fn accept(
        &self,
        contract: &Contract,
        method: &MethodDefinition,
        body: &Value,
        ctx: &CallContext,
    ) {
        if let Err(err) = contract.validate_input(body) {
            warn!(method = %method.name, error = %err, "notification dropped");
            return;
        }
        if !self.authorized(method, ctx) {
            warn!(method = %method.name, principal = ?ctx.principal, "notification forbidden");
            return;
        }
        let Some(handler) = self.handlers.get(&method.name) else {
            warn!(method = %method.name, "no handler registered");
            return;
        };

        let params = body.get("params").cloned().unwrap_or(Value::Null);
        match handler.call(params, ctx) {
            Ok(_) => debug!(method = %method.name, "notification handled"),
            Err(error) => warn!(method = %method.name, error = %error, "notification failed"),
        }
    }

    fn authorized(&self, method: &MethodDefinition, ctx: &CallContext) -> bool {
        self.authorizer
            .as_ref()
            .is_none_or(|authorizer| authorizer.authorize(method, ctx))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        handlers.sort_unstable();
        f.debug_struct("Router")
            .field("methods", &self.registry.len())
            .field("handlers", &handlers)
            .field("authorizer", &self.authorizer.is_some())
            .finish()
    }
}
