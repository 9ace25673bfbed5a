//! Demo service with `get_user` and `notify`, served under `/api` and `/orpc`.
//!
//! Run with:
//!   cargo run -p openrpc-kit --example server --features server
//!
//! In another terminal:
//!   cargo run -p openrpc-kit --features cli -- methods http://127.0.0.1:3000/api
//!   curl -s http://127.0.0.1:3000/orpc/get_user -H 'x-roles: admin' \
//!     -d '{"jsonrpc":"2.0","method":"get_user","id":"1","params":{"id":"42"}}'
//!
//! Callers declare their roles in an `x-roles` header (comma separated).
//! Without it a call to `get_user` is answered with -32001 Forbidden.

use std::sync::Arc;

use axum::http::HeaderMap;
use openrpc_kit::http::HttpService;
use openrpc_kit::protocol::{ErrorObject, Info, Role, Server};
use openrpc_kit::registry::{
    CallContext, HandlerResult, MethodSpec, Registry, RoleAuthorizer, Router,
};
use openrpc_kit::schema::Schema;
use serde_json::{json, Value};

const ADDR: &str = "127.0.0.1:3000";

fn registry() -> Result<Registry, Box<dyn std::error::Error>> {
    let mut registry = Registry::new(
        Server::new(format!("http://{ADDR}/api")),
        Some(Info::new("Qualify Services RPC", "1.0.1")),
    );
    registry.request(
        "get_user",
        MethodSpec::new()
            .params(Schema::from_value(json!({
                "type": "object",
                "properties": {"id": {"type": "string"}},
                "required": ["id"]
            }))?)
            .result(Schema::from_value(json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "avatar": {"type": "string"}},
                "required": ["name", "avatar"]
            }))?)
            .permissions([Role::ADMIN, Role::SELF])
            .summary("Look up a user"),
    )?;
    registry.notification(
        "notify",
        MethodSpec::new()
            .params(Schema::from_value(json!({
                "type": "object",
                "properties": {
                    "from": {"type": "string"},
                    "to": {"type": "string"},
                    "message": {"type": "string"},
                    "obj": {}
                },
                "required": ["from", "to", "message"]
            }))?)
            .permissions([Role::AUTHENTICATED]),
    )?;
    Ok(registry)
}

fn get_user(params: Value, _ctx: &CallContext) -> HandlerResult {
    let id = params["id"].as_str().ok_or_else(ErrorObject::invalid_params)?;
    Ok(json!({"name": format!("mario{id}"), "avatar": "avatar"}))
}

fn notify(params: Value, ctx: &CallContext) -> HandlerResult {
    eprintln!("notification from {:?}: {params}", ctx.principal);
    Ok(Value::Null)
}

fn roles(headers: &HeaderMap) -> CallContext {
    let roles = headers
        .get("x-roles")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    CallContext::with_roles(roles)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let router = Router::new(Arc::new(registry()?))?
        .handler("get_user", get_user)?
        .handler("notify", notify)?
        .with_authorizer(RoleAuthorizer);

    let app = HttpService::new(router)
        .prefix("/api")
        .prefix("/orpc")
        .with_context(roles)
        .into_router();

    let listener = tokio::net::TcpListener::bind(ADDR).await?;
    eprintln!("Listening on http://{ADDR} (/api, /orpc)");
    axum::serve(listener, app).await?;
    Ok(())
}
