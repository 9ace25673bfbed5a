use std::collections::HashMap;

use openrpc_kit_protocol::{
    discovery_result_schema, mint_id, response_envelope, DiscoveryDocument, ErrorObject,
    HttpMethod, Info, MethodDescriptor, Request, DISCOVER_METHOD,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::method::MethodHandle;
use crate::transport::{send_with_timeout, Transport, TransportRequest};

/// A fetched and parsed discovery document, not yet callable.
#[derive(Debug)]
pub struct Discovered<T> {
    transport: T,
    config: ClientConfig,
    discovery_url: String,
    document: DiscoveryDocument,
}

impl<T: Transport> Discovered<T> {
    pub fn document(&self) -> &DiscoveryDocument {
        &self.document
    }

    pub fn info(&self) -> &Info {
        &self.document.info
    }

    /// URL methods are called at.
    pub fn server_url(&self) -> Option<&str> {
        self.document.server().map(|server| server.url.as_str())
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.document.methods
    }

    /// Install a callable per published method.
    pub fn build(self) -> Result<Client<T>> {
        let table = MethodTable::build(&self.document, &self.config)?;
        Ok(Client {
            transport: self.transport,
            config: self.config,
            discovery_url: self.discovery_url,
            document: self.document,
            table,
        })
    }
}

/// Client whose methods come from a service's discovery document.
///
/// Methods are looked up by their exposed name: `get_user` on the wire is
/// `getUser` here.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
    discovery_url: String,
    document: DiscoveryDocument,
    table: MethodTable,
}

impl<T: Transport> Client<T> {
    /// Discover the service at `url` and build the client.
    pub async fn create(url: &str, transport: T) -> Result<Self> {
        Self::discover(url, transport).await?.build()
    }

    pub async fn create_with_config(url: &str, transport: T, config: ClientConfig) -> Result<Self> {
        Self::discover_with_config(url, transport, config)
            .await?
            .build()
    }

    /// Fetch and parse the discovery document at `url`.
    pub async fn discover(url: &str, transport: T) -> Result<Discovered<T>> {
        Self::discover_with_config(url, transport, ClientConfig::default()).await
    }

    pub async fn discover_with_config(
        url: &str,
        transport: T,
        config: ClientConfig,
    ) -> Result<Discovered<T>> {
        let document = fetch_document(&transport, url, &config).await?;
        Ok(Discovered {
            transport,
            config,
            discovery_url: url.to_string(),
            document,
        })
    }

    /// Rediscover and replace the method table.
    ///
    /// The current table is kept if anything fails.
    pub async fn refresh(&mut self) -> Result<()> {
        let document = fetch_document(&self.transport, &self.discovery_url, &self.config).await?;
        self.table = MethodTable::build(&document, &self.config)?;
        self.document = document;
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.table.methods.contains_key(name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodHandle> {
        self.table.methods.get(name)
    }

    /// Exposed method names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.order.iter().map(String::as_str)
    }

    /// Handles in document order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodHandle> {
        self.table
            .order
            .iter()
            .filter_map(|name| self.table.methods.get(name))
    }

    pub fn info(&self) -> &Info {
        &self.document.info
    }

    pub fn document(&self) -> &DiscoveryDocument {
        &self.document
    }

    pub fn discovery_url(&self) -> &str {
        &self.discovery_url
    }

    pub fn server_url(&self) -> &str {
        &self.table.server_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call a method by exposed name.
    ///
    /// `Value::Null` sends no params. Notifications resolve to `Value::Null`
    /// once sent.
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        let handle = self
            .method(name)
            .ok_or_else(|| ClientError::UnknownMethod(name.to_string()))?;

        let (id, envelope) = handle.envelope(params)?;
        handle
            .input_schema()
            .validate(&envelope)
            .map_err(|source| ClientError::Validation {
                method: handle.name().to_string(),
                source,
            })?;

        debug!(method = handle.name(), id = ?id, url = handle.url(), "calling remote method");
        let request = TransportRequest {
            http_method: HttpMethod::Post,
            url: handle.url().to_string(),
            body: envelope,
        };
        let body = send_with_timeout(&self.transport, request, self.config.timeout)
            .await
            .map_err(|source| ClientError::RemoteCall {
                method: handle.name().to_string(),
                id: id.clone(),
                source,
            })?;

        match id {
            None => Ok(Value::Null),
            Some(id) => self.read_response(handle, &id, body),
        }
    }

    /// Call with typed params and result.
    pub async fn call_as<P, R>(&self, name: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let result = self.call(name, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    fn read_response(&self, handle: &MethodHandle, id: &str, body: Option<Value>) -> Result<Value> {
        let method = handle.name();
        let body = body.ok_or_else(|| ClientError::Protocol(format!("no response to {method}")))?;
        let object = body
            .as_object()
            .ok_or_else(|| ClientError::Protocol(format!("response to {method} is not an object")))?;

        let is_error = exactly_one_outcome(object, method)?;
        match object.get("id") {
            Some(Value::String(got)) if got == id => {}
            Some(Value::Null) if is_error => {}
            other => {
                return Err(ClientError::Protocol(format!(
                    "response to {method} has id {other:?}, expected {id}"
                )));
            }
        }

        if is_error {
            let error: ErrorObject = serde_json::from_value(object["error"].clone())?;
            return Err(ClientError::Rpc {
                method: method.to_string(),
                id: Some(id.to_string()),
                error,
            });
        }

        if self.config.validate_output {
            if let Some(output) = handle.output_schema() {
                output
                    .validate(&body)
                    .map_err(|source| ClientError::InvalidResponse {
                        method: method.to_string(),
                        source,
                    })?;
            }
        }

        Ok(object.get("result").cloned().unwrap_or(Value::Null))
    }
}

/// Exposed name to handle, plus document order.
#[derive(Debug)]
struct MethodTable {
    server_url: String,
    methods: HashMap<String, MethodHandle>,
    order: Vec<String>,
}

impl MethodTable {
    fn build(document: &DiscoveryDocument, config: &ClientConfig) -> Result<Self> {
        let server_url = document
            .server()
            .map(|server| server.url.clone())
            .ok_or_else(|| ClientError::Discovery("document lists no servers".to_string()))?;

        let mut methods = HashMap::with_capacity(document.methods.len());
        let mut order = Vec::with_capacity(document.methods.len());
        for descriptor in &document.methods {
            let handle = MethodHandle::build(descriptor.clone(), &server_url, config)?;
            let exposed = handle.exposed_name().to_string();
            if let Some(first) = methods.get(&exposed).map(|h: &MethodHandle| h.name().to_string()) {
                return Err(ClientError::NameCollision {
                    exposed,
                    first,
                    second: descriptor.name.clone(),
                });
            }
            order.push(exposed.clone());
            methods.insert(exposed, handle);
        }

        Ok(Self {
            server_url,
            methods,
            order,
        })
    }
}

/// Returns whether the response carries `error`.
fn exactly_one_outcome(object: &Map<String, Value>, method: &str) -> Result<bool> {
    match (object.contains_key("result"), object.contains_key("error")) {
        (true, false) => Ok(false),
        (false, true) => Ok(true),
        (true, true) => Err(ClientError::Protocol(format!(
            "response to {method} carries both result and error"
        ))),
        (false, false) => Err(ClientError::Protocol(format!(
            "response to {method} carries neither result nor error"
        ))),
    }
}

async fn fetch_document<T: Transport>(
    transport: &T,
    url: &str,
    config: &ClientConfig,
) -> Result<DiscoveryDocument> {
    let id = mint_id();
    let request = TransportRequest {
        http_method: HttpMethod::Get,
        url: url.to_string(),
        body: serde_json::to_value(Request::new(DISCOVER_METHOD, id.clone(), None))?,
    };

    let body = send_with_timeout(transport, request, config.timeout)
        .await
        .map_err(|source| ClientError::RemoteCall {
            method: DISCOVER_METHOD.to_string(),
            id: Some(id.clone()),
            source,
        })?
        .ok_or_else(|| ClientError::Discovery(format!("{url} returned no body")))?;

    let document = if body.get("openrpc").is_some() {
        body
    } else {
        unwrap_discovery_response(body, &id)?
    };
    let document: DiscoveryDocument = serde_json::from_value(document)
        .map_err(|err| ClientError::Discovery(format!("malformed document: {err}")))?;

    info!(
        url,
        title = %document.info.title,
        version = %document.info.version,
        methods = document.methods.len(),
        "discovered service"
    );
    Ok(document)
}

fn unwrap_discovery_response(body: Value, id: &str) -> Result<Value> {
    let object = body
        .as_object()
        .ok_or_else(|| ClientError::Discovery("response is not an object".to_string()))?;

    if exactly_one_outcome(object, DISCOVER_METHOD)? {
        let error: ErrorObject = serde_json::from_value(object["error"].clone())?;
        return Err(ClientError::Rpc {
            method: DISCOVER_METHOD.to_string(),
            id: object.get("id").and_then(Value::as_str).map(str::to_string),
            error,
        });
    }
    if object.get("id").and_then(Value::as_str) != Some(id) {
        return Err(ClientError::Protocol(format!(
            "discovery response id does not match {id}"
        )));
    }

    response_envelope(&discovery_result_schema()?)?
        .validate(&body)
        .map_err(|err| ClientError::Discovery(err.to_string()))?;

    body.get("result")
        .and_then(|result| result.get("schema"))
        .cloned()
        .ok_or_else(|| ClientError::Discovery("response carries no schema".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use openrpc_kit_protocol::{notification_envelope, request_envelope, Server};
    use openrpc_kit_registry::{
        CallContext, Dispatch, HandlerResult, MethodSpec, Registry, RoleAuthorizer, Router,
    };
    use openrpc_kit_schema::Schema;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::error::TransportError;

    const BASE: &str = "http://localhost:3000";
    const DISCOVERY_URL: &str = "http://localhost:3000/rpc.discover";

    #[allow(dead_code)]
    #[derive(Serialize, Deserialize, JsonSchema)]
    struct GetUserParams {
        id: String,
    }

    #[derive(Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
    struct User {
        name: String,
        avatar: String,
    }

    /// Drives a real router in-process and records every request.
    struct RouterTransport {
        router: Router,
        ctx: CallContext,
        sent: Mutex<Vec<TransportRequest>>,
    }

    impl RouterTransport {
        fn new(router: Router) -> Arc<Self> {
            Arc::new(Self {
                router,
                ctx: CallContext::with_roles(["admin"]),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<TransportRequest> {
            self.sent.lock().unwrap().clone()
        }

        fn calls(&self) -> Vec<TransportRequest> {
            self.sent()
                .into_iter()
                .filter(|r| r.http_method == HttpMethod::Post)
                .collect()
        }
    }

    impl Transport for RouterTransport {
        async fn send(&self, request: TransportRequest) -> std::result::Result<Option<Value>, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            let path = request.url.strip_prefix(BASE).unwrap_or(&request.url);
            match self.router.route(request.http_method, path, &request.body, &self.ctx) {
                Dispatch::Reply(response) => Ok(Some(serde_json::to_value(response).unwrap())),
                Dispatch::Accepted => Ok(None),
                Dispatch::NotFound => Err(TransportError::Status {
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }

    /// Answers every request with the same canned body.
    #[derive(Debug)]
    struct Canned(Option<Value>);

    impl Transport for Canned {
        async fn send(&self, _request: TransportRequest) -> std::result::Result<Option<Value>, TransportError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct Stalled;

    impl Transport for Stalled {
        async fn send(&self, _request: TransportRequest) -> std::result::Result<Option<Value>, TransportError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
    }

    /// Serves the document on GET and fails every POST.
    #[derive(Debug)]
    struct Unreachable(Value);

    impl Transport for Unreachable {
        async fn send(&self, request: TransportRequest) -> std::result::Result<Option<Value>, TransportError> {
            match request.http_method {
                HttpMethod::Get => Ok(Some(self.0.clone())),
                HttpMethod::Post => Err(TransportError::Http("connection refused".to_string())),
            }
        }
    }

    /// Serves the document on GET and answers calls with `reply(request body)`.
    struct Scripted {
        document: Value,
        reply: fn(&Value) -> Value,
    }

    impl Transport for Scripted {
        async fn send(&self, request: TransportRequest) -> std::result::Result<Option<Value>, TransportError> {
            match request.http_method {
                HttpMethod::Get => Ok(Some(self.document.clone())),
                HttpMethod::Post => Ok(Some((self.reply)(&request.body))),
            }
        }
    }

    fn scripted(reply: fn(&Value) -> Value) -> Scripted {
        Scripted {
            document: serde_json::to_value(registry().schema()).unwrap(),
            reply,
        }
    }

    fn malformed_user(request: &Value) -> Value {
        json!({"jsonrpc": "2.0", "id": request["id"], "result": {"name": 1}})
    }

    fn notify_params() -> Schema {
        Schema::from_value(json!({
            "type": "object",
            "properties": {
                "from": {"type": "string"},
                "to": {"type": "string"},
                "message": {"type": "string"},
                "obj": {}
            },
            "required": ["from", "to", "message"]
        }))
        .unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new(
            Server::new(BASE),
            Some(Info::new("Qualify Services RPC", "1.0.1")),
        );
        registry
            .request(
                "get_user",
                MethodSpec::new()
                    .params(Schema::of::<GetUserParams>().unwrap())
                    .result(Schema::of::<User>().unwrap())
                    .permissions(["admin", "self"]),
            )
            .unwrap();
        registry
            .notification(
                "notify",
                MethodSpec::new()
                    .params(notify_params())
                    .permissions(["authenticated"]),
            )
            .unwrap();
        registry
    }

    fn get_user(params: Value, _ctx: &CallContext) -> HandlerResult {
        Ok(json!({"name": format!("user-{}", params["id"].as_str().unwrap_or("?")), "avatar": "a.png"}))
    }

    fn transport() -> Arc<RouterTransport> {
        let router = Router::new(Arc::new(registry()))
            .unwrap()
            .handler("get_user", get_user)
            .unwrap()
            .handler("notify", |_params: Value, _ctx: &CallContext| -> HandlerResult {
                Ok(Value::Null)
            })
            .unwrap();
        RouterTransport::new(router)
    }

    #[tokio::test]
    async fn reconstructs_and_calls_request() {
        let transport = transport();
        let client = Client::create(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();

        assert_eq!(client.info().title, "Qualify Services RPC");
        assert_eq!(client.server_url(), BASE);
        let result = client.call("getUser", json!({"id": "42"})).await.unwrap();
        assert_eq!(result["name"], "user-42");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "http://localhost:3000/get_user");

        let params = Schema::of::<GetUserParams>().unwrap();
        let contract = request_envelope("get_user", &params).unwrap();
        assert!(contract.validate(&calls[0].body).is_ok());
    }

    #[tokio::test]
    async fn typed_call() {
        let client = Client::create(DISCOVERY_URL, transport()).await.unwrap();
        let user: User = client
            .call_as("getUser", &GetUserParams { id: "7".to_string() })
            .await
            .unwrap();
        assert_eq!(
            user,
            User {
                name: "user-7".to_string(),
                avatar: "a.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn notification_sends_no_id() {
        let transport = transport();
        let client = Client::create(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();

        let result = client
            .call("notify", json!({"from": "a", "to": "b", "message": "hi"}))
            .await
            .unwrap();
        assert_eq!(result, Value::Null);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].body.get("id").is_none());
        let contract = notification_envelope("notify", &notify_params()).unwrap();
        assert!(contract.validate(&calls[0].body).is_ok());
    }

    #[tokio::test]
    async fn exposes_camel_case_names() {
        let client = Client::create(DISCOVERY_URL, transport()).await.unwrap();

        assert!(client.has("getUser"));
        assert!(client.has("notify"));
        assert!(!client.has("get_user"));
        assert_eq!(client.names().collect::<Vec<_>>(), vec!["getUser", "notify"]);
        assert_eq!(client.method("getUser").unwrap().name(), "get_user");
    }

    #[tokio::test]
    async fn invalid_params_never_reach_the_transport() {
        let transport = transport();
        let client = Client::create(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();

        let err = client.call("getUser", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref method, .. } if method == "get_user"));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_method_is_an_error() {
        let client = Client::create(DISCOVERY_URL, transport()).await.unwrap();
        assert!(matches!(
            client.call("deleteUser", Value::Null).await,
            Err(ClientError::UnknownMethod(name)) if name == "deleteUser"
        ));
    }

    #[tokio::test]
    async fn discovery_is_stable() {
        let transport = transport();
        let first = Client::discover(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();
        let second = Client::discover(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();

        assert_eq!(first.document(), second.document());
        assert_eq!(first.methods().len(), 2);
        let discovery = &transport.sent()[0];
        assert_eq!(discovery.http_method, HttpMethod::Get);
        assert_eq!(discovery.body["method"], "rpc.discover");
    }

    #[tokio::test]
    async fn discovered_state_exposes_record_before_build() {
        let discovered = Client::discover(DISCOVERY_URL, transport()).await.unwrap();
        assert_eq!(discovered.server_url(), Some(BASE));
        assert_eq!(discovered.info().version, "1.0.1");

        let get_user = &discovered.methods()[0];
        assert!(get_user.permissions().contains("admin"));
        assert!(discovered.methods()[1].is_notification());

        let client = discovered.build().unwrap();
        assert!(client.has("getUser"));
    }

    #[tokio::test]
    async fn rpc_errors_surface() {
        let router = Router::new(Arc::new(registry()))
            .unwrap()
            .handler("get_user", get_user)
            .unwrap()
            .with_authorizer(RoleAuthorizer);
        let transport = Arc::new(RouterTransport {
            router,
            ctx: CallContext::with_roles(["authenticated"]),
            sent: Mutex::new(Vec::new()),
        });
        let client = Client::create(DISCOVERY_URL, transport).await.unwrap();

        let err = client.call("getUser", json!({"id": "1"})).await.unwrap_err();
        assert!(matches!(err, ClientError::Rpc { ref error, .. } if error.code == -32001));
    }

    #[tokio::test]
    async fn accepts_bare_documents() {
        let document = serde_json::to_value(registry().schema()).unwrap();
        let discovered = Client::discover(DISCOVERY_URL, Canned(Some(document))).await.unwrap();
        assert_eq!(discovered.methods().len(), 2);
    }

    #[tokio::test]
    async fn response_must_carry_exactly_one_outcome() {
        let document = serde_json::to_value(registry().schema()).unwrap();
        // Calls get the discovery document back: neither result nor error.
        let client = Client::create(DISCOVERY_URL, Canned(Some(document))).await.unwrap();

        let err = client.call("getUser", Value::Null).await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol(ref msg) if msg.contains("neither")));
    }

    #[tokio::test]
    async fn transport_failures_are_wrapped() {
        let document = serde_json::to_value(registry().schema()).unwrap();
        let client = Client::create(DISCOVERY_URL, Unreachable(document)).await.unwrap();

        let err = client.call("getUser", json!({"id": "1"})).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteCall {
                ref method,
                id: Some(_),
                source: TransportError::Http(_),
            } if method == "get_user"
        ));
    }

    #[tokio::test]
    async fn notification_transport_failures_carry_no_id() {
        let document = serde_json::to_value(registry().schema()).unwrap();
        let client = Client::create(DISCOVERY_URL, Unreachable(document)).await.unwrap();

        let err = client
            .call("notify", json!({"from": "a", "to": "b", "message": "hi"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RemoteCall { id: None, .. }));
    }

    #[tokio::test]
    async fn request_with_null_result_still_gets_an_id() {
        let mut registry = registry();
        registry
            .request(
                "ping",
                MethodSpec::new()
                    .params(Schema::any().unwrap())
                    .result(Schema::from_value(json!({"type": "null"})).unwrap()),
            )
            .unwrap();
        let router = Router::new(Arc::new(registry))
            .unwrap()
            .handler("ping", |_params: Value, _ctx: &CallContext| -> HandlerResult {
                Ok(Value::Null)
            })
            .unwrap();
        let transport = RouterTransport::new(router);
        let client = Client::create(DISCOVERY_URL, Arc::clone(&transport)).await.unwrap();

        let ping = client.method("ping").unwrap();
        assert!(!ping.is_notification());
        assert_eq!(client.call("ping", json!({})).await.unwrap(), Value::Null);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].body["id"].is_string());
    }

    #[tokio::test]
    async fn results_violating_the_contract_are_rejected() {
        let client = Client::create(DISCOVERY_URL, scripted(malformed_user)).await.unwrap();

        let err = client.call("getUser", json!({"id": "1"})).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { ref method, .. } if method == "get_user"));
    }

    #[tokio::test]
    async fn output_validation_can_be_disabled() {
        let config = ClientConfig::default().with_validate_output(false);
        let client = Client::create_with_config(DISCOVERY_URL, scripted(malformed_user), config)
            .await
            .unwrap();

        let result = client.call("getUser", json!({"id": "1"})).await.unwrap();
        assert_eq!(result, json!({"name": 1}));
    }

    #[tokio::test]
    async fn response_id_must_match_the_request() {
        let client = Client::create(
            DISCOVERY_URL,
            scripted(|_request| {
                json!({"jsonrpc": "2.0", "id": "someone-else", "result": {"name": "x", "avatar": "y"}})
            }),
        )
        .await
        .unwrap();

        let err = client.call("getUser", json!({"id": "1"})).await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol(ref msg) if msg.contains("someone-else")));
    }

    #[tokio::test]
    async fn discovery_response_id_must_match() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": "someone-else",
            "result": {"name": "svc", "schema": {}}
        });
        let err = Client::discover(DISCOVERY_URL, Canned(Some(reply)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Protocol(ref msg) if msg.contains("discovery")));
    }

    #[tokio::test]
    async fn empty_body_for_request_is_protocol_error() {
        let document = serde_json::to_value(registry().schema()).unwrap();
        let discovered = Client::discover(DISCOVERY_URL, Canned(Some(document))).await.unwrap();
        let mut client = discovered.build().unwrap();
        client.transport = Canned(None);

        let err = client.call("getUser", json!({"id": "1"})).await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol(ref msg) if msg.contains("no response")));
    }

    #[tokio::test]
    async fn colliding_exposed_names_fail_the_build() {
        let mut document = serde_json::to_value(registry().schema()).unwrap();
        let mut twin = document["methods"][0].clone();
        twin["name"] = json!("getUser");
        document["methods"].as_array_mut().unwrap().push(twin);

        let discovered = Client::discover(DISCOVERY_URL, Canned(Some(document))).await.unwrap();
        assert!(matches!(
            discovered.build(),
            Err(ClientError::NameCollision { ref exposed, .. }) if exposed == "getUser"
        ));
    }

    #[tokio::test]
    async fn documents_without_servers_are_rejected() {
        let mut document = serde_json::to_value(registry().schema()).unwrap();
        document["servers"] = json!([]);

        let discovered = Client::discover(DISCOVERY_URL, Canned(Some(document))).await.unwrap();
        assert!(matches!(discovered.build(), Err(ClientError::Discovery(_))));
    }

    #[tokio::test]
    async fn discovery_timeout_is_reported() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(20));
        let err = Client::discover_with_config(DISCOVERY_URL, Stalled, config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteCall { source: TransportError::Timeout(_), .. }
        ));
    }

    #[tokio::test]
    async fn refresh_replaces_the_table() {
        let mut client = Client::create(DISCOVERY_URL, transport()).await.unwrap();
        assert!(client.has("getUser"));

        let mut redeployed = Registry::new(
            Server::new(BASE),
            Some(Info::new("Qualify Services RPC", "1.1.0")),
        );
        redeployed
            .request(
                "list_users",
                MethodSpec::new()
                    .params(Schema::any().unwrap())
                    .result(Schema::from_value(json!({"type": "array"})).unwrap()),
            )
            .unwrap();
        client.transport = RouterTransport::new(Router::new(Arc::new(redeployed)).unwrap());

        client.refresh().await.unwrap();
        assert_eq!(client.names().collect::<Vec<_>>(), vec!["listUsers"]);
        assert!(!client.has("getUser"));
        assert_eq!(client.info().version, "1.1.0");
        assert_eq!(client.discovery_url(), DISCOVERY_URL);
    }
}
