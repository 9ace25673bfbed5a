#![cfg(all(feature = "cli", feature = "server"))]

use std::net::TcpListener;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::{self, Next};
use openrpc_kit::http::HttpService;
use openrpc_kit::protocol::{ErrorObject, Info, Server};
use openrpc_kit::registry::{CallContext, HandlerResult, MethodSpec, Registry, Router};
use openrpc_kit::schema::Schema;
use serde_json::{json, Value};

/// The demo service on a loopback port, counting every POST it receives.
struct TestService {
    base: String,
    posts: Arc<AtomicUsize>,
}

impl TestService {
    fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        listener
            .set_nonblocking(true)
            .expect("listener should become non-blocking");
        let base = format!(
            "http://{}",
            listener.local_addr().expect("listener should have an address")
        );
        let posts = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&posts);
        let app = HttpService::new(router(&base))
            .into_router()
            .layer(middleware::from_fn(move |req: Request, next: Next| {
                let seen = Arc::clone(&seen);
                async move {
                    if *req.method() == Method::POST {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                    next.run(req).await
                }
            }));

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime should build");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("listener should convert");
                axum::serve(listener, app).await.expect("server should run");
            });
        });

        Self { base, posts }
    }

    fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }
}

fn router(base: &str) -> Router {
    let mut registry = Registry::new(Server::new(base), Some(Info::new("Qualify Services RPC", "1.0.1")));
    registry
        .request(
            "get_user",
            MethodSpec::new()
                .params(
                    Schema::from_value(json!({
                        "type": "object",
                        "properties": {"id": {"type": "string"}},
                        "required": ["id"]
                    }))
                    .expect("params schema should compile"),
                )
                .result(
                    Schema::from_value(json!({
                        "type": "object",
                        "properties": {"name": {"type": "string"}, "avatar": {"type": "string"}},
                        "required": ["name", "avatar"]
                    }))
                    .expect("result schema should compile"),
                )
                .permissions(["admin", "self"]),
        )
        .expect("get_user should register");
    registry
        .notification(
            "notify",
            MethodSpec::new()
                .params(Schema::any().expect("any schema should compile"))
                .permissions(["authenticated"]),
        )
        .expect("notify should register");

    Router::new(Arc::new(registry))
        .expect("router should build")
        .handler("get_user", |params: Value, _ctx: &CallContext| -> HandlerResult {
            match params["id"].as_str() {
                Some("missing") => Err(ErrorObject::new(-32050, "user not found")),
                Some(id) => Ok(json!({"name": format!("user-{id}"), "avatar": "a.png"})),
                None => Err(ErrorObject::invalid_params()),
            }
        })
        .expect("get_user handler should attach")
        .handler("notify", |_params: Value, _ctx: &CallContext| -> HandlerResult {
            Ok(Value::Null)
        })
        .expect("notify handler should attach")
}

fn cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_openrpc-kit"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("OPENRPC_KIT_URL")
        .env_remove("OPENRPC_KIT_TIMEOUT")
        .output()
        .expect("openrpc-kit should run")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn discover_prints_document() {
    let service = TestService::start();
    let output = cli(&["--format", "json", "discover", &service.base]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let document = stdout_json(&output);
    assert_eq!(document["openrpc"], "1.3.2");
    assert_eq!(document["info"]["title"], "Qualify Services RPC");
    assert_eq!(document["methods"][0]["name"], "get_user");
    assert_eq!(service.posts(), 0);
}

#[test]
fn methods_lists_exposed_names() {
    let service = TestService::start();
    let output = cli(&["--format", "json", "methods", &service.base]);

    assert!(output.status.success());
    let rows = stdout_json(&output);
    assert_eq!(rows[0]["exposed"], "getUser");
    assert_eq!(rows[0]["name"], "get_user");
    assert_eq!(rows[0]["roles"], json!(["admin", "self"]));
    assert_eq!(rows[1]["exposed"], "notify");
    assert_eq!(rows[1]["kind"], "notification");
}

#[test]
fn call_returns_result() {
    let service = TestService::start();
    let output = cli(&[
        "--format",
        "json",
        "call",
        &service.base,
        "getUser",
        "--params",
        r#"{"id":"42"}"#,
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["name"], "user-42");
    assert_eq!(service.posts(), 1);
}

#[test]
fn call_accepts_url_from_env() {
    let service = TestService::start();
    let output = Command::new(env!("CARGO_BIN_EXE_openrpc-kit"))
        .args(["--log-level", "error", "--format", "json", "methods"])
        .env("OPENRPC_KIT_URL", format!("{}/rpc.discover", service.base))
        .output()
        .expect("openrpc-kit should run");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)[0]["exposed"], "getUser");
}

#[test]
fn notification_prints_nothing() {
    let service = TestService::start();
    let output = cli(&[
        "--format",
        "json",
        "call",
        &service.base,
        "notify",
        "--params",
        r#"{"message":"hi"}"#,
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(service.posts(), 1);
}

#[test]
fn invalid_params_exit_60_without_sending() {
    let service = TestService::start();
    let output = cli(&["call", &service.base, "getUser", "--params", "{}"]);

    assert_eq!(output.status.code(), Some(60));
    assert_eq!(service.posts(), 0);
}

#[test]
fn unknown_method_exits_64() {
    let service = TestService::start();
    let output = cli(&["call", &service.base, "deleteUser"]);

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn rpc_error_exits_1() {
    let service = TestService::start();
    let output = cli(&["call", &service.base, "getUser", "--params", r#"{"id":"missing"}"#]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("user not found"));
}

#[test]
fn unreachable_service_exits_3() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let output = cli(&["--timeout", "2s", "discover", &format!("http://{addr}")]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn bad_timeout_exits_64() {
    let output = cli(&["--timeout", "soon", "discover", "http://127.0.0.1:9"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_reports_package_version() {
    let output = cli(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("openrpc-kit "));
}
