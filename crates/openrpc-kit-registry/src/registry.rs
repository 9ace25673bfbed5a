use std::collections::HashMap;

use openrpc_kit_protocol::{
    discovery_result_schema, request_envelope, response_envelope, snake_to_camel,
    DiscoveryDocument, Info, Server, DISCOVER_METHOD, OPENRPC_VERSION,
};
use openrpc_kit_schema::Schema;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::contract::{Contract, HttpMethod, Route};
use crate::error::{RegistryError, Result};
use crate::method::{MethodDefinition, MethodKind, MethodSpec};

const RESERVED_PREFIX: &str = "rpc.";

/// Methods, contracts and service metadata of one OpenRPC service.
///
/// Register everything through `&mut self` at startup, then share the
/// finished registry as `Arc<Registry>`; it is read-only from then on.
#[derive(Debug)]
pub struct Registry {
    info: Info,
    server: Server,
    config: RegistryConfig,
    methods: Vec<MethodDefinition>,
    index: HashMap<String, usize>,
    exposed: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry. `info` defaults to [`Info::default`].
    pub fn new(server: Server, info: Option<Info>) -> Self {
        Self::with_config(server, info, RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(server: Server, info: Option<Info>, config: RegistryConfig) -> Self {
        Self {
            info: info.unwrap_or_default(),
            server,
            config,
            methods: Vec::new(),
            index: HashMap::new(),
            exposed: HashMap::new(),
        }
    }

    /// Register a Request method and return its contract (`POST /{name}`).
    pub fn request(&mut self, name: &str, spec: MethodSpec) -> Result<Contract> {
        let result = spec.result.clone().ok_or_else(|| RegistryError::MissingSchema {
            method: name.to_string(),
            field: "result",
        })?;
        self.register(name, MethodKind::Request, spec, Some(result))
    }

    /// Register a Notification method and return its contract (`POST /{name}`).
    pub fn notification(&mut self, name: &str, spec: MethodSpec) -> Result<Contract> {
        if spec.result.is_some() {
            return Err(RegistryError::UnexpectedResultSchema(name.to_string()));
        }
        self.register(name, MethodKind::Notification, spec, None)
    }

    /// Contract of the discovery method (`GET /rpc.discover`).
    ///
    /// The discovery method is not part of the method table, so the
    /// document never lists itself.
    pub fn discover(&self) -> Result<Contract> {
        Ok(Contract {
            name: DISCOVER_METHOD.to_string(),
            kind: MethodKind::Request,
            route: Route::new(HttpMethod::Get, DISCOVER_METHOD),
            input: request_envelope(DISCOVER_METHOD, &Schema::any()?)?,
            output: Some(response_envelope(&discovery_result_schema()?)?),
        })
    }

    /// Render the discovery document from the current registrations.
    ///
    /// Methods appear in registration order. Nothing is cached.
    pub fn schema(&self) -> DiscoveryDocument {
        let methods = self
            .methods
            .iter()
            .map(MethodDefinition::descriptor)
            .collect::<Vec<_>>();
        debug!(
            title = %self.info.title,
            methods = methods.len(),
            "rendered discovery document"
        );

        DiscoveryDocument {
            openrpc: OPENRPC_VERSION.to_string(),
            info: self.info.clone(),
            servers: vec![self.server.clone()],
            methods,
        }
    }

    /// Contract of a registered method, or of `rpc.discover`.
    pub fn contract(&self, name: &str) -> Result<Contract> {
        if name == DISCOVER_METHOD {
            return self.discover();
        }
        self.method(name)
            .ok_or_else(|| RegistryError::UnknownMethod(name.to_string()))?
            .contract()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.index.get(name).map(|&idx| &self.methods[idx])
    }

    /// Registered methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn register(
        &mut self,
        name: &str,
        kind: MethodKind,
        spec: MethodSpec,
        result: Option<Schema>,
    ) -> Result<Contract> {
        validate_method_name(name)?;

        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateMethod(name.to_string()));
        }

        let exposed = snake_to_camel(name);
        if let Some(existing) = self.exposed.get(&exposed) {
            return Err(RegistryError::ExposedNameCollision {
                name: name.to_string(),
                exposed,
                existing: existing.clone(),
            });
        }

        let params = spec.params.ok_or_else(|| RegistryError::MissingSchema {
            method: name.to_string(),
            field: "params",
        })?;

        let definition = MethodDefinition {
            name: name.to_string(),
            kind,
            params: self.compile(params)?,
            result: result.map(|schema| self.compile(schema)).transpose()?,
            permissions: spec.permissions.unwrap_or_default(),
            description: spec.description,
            summary: spec.summary,
            external_docs: spec.external_docs,
            tags: spec.tags,
        };
        let contract = definition.contract()?;

        debug!(
            method = name,
            kind = ?kind,
            route = %contract.route,
            roles = ?definition.permissions.roles(),
            "registered method"
        );

        self.index.insert(name.to_string(), self.methods.len());
        self.exposed.insert(exposed, name.to_string());
        self.methods.push(definition);

        Ok(contract)
    }

    fn compile(&self, schema: Schema) -> Result<Schema> {
        if self.config.schema.strict_mode {
            Ok(Schema::from_value_with_config(
                schema.to_json_schema(),
                &self.config.schema,
            )?)
        } else {
            Ok(schema)
        }
    }
}

fn validate_method_name(name: &str) -> Result<()> {
    if name.starts_with(RESERVED_PREFIX) {
        return Err(RegistryError::ReservedMethodName(name.to_string()));
    }

    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('/') {
        Some("must not contain '/'")
    } else if name.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RegistryError::InvalidMethodName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
