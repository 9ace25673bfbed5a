//! OpenRPC discovery document types (1.3.2 subset).
//!
//! Not emitted: `components` and `externalDocs` at the document root,
//! `deprecated`, `errors`, `links` and `examples` on methods.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::permissions::{Permissions, Role};

/// OpenRPC version of every rendered document.
pub const OPENRPC_VERSION: &str = "1.3.2";

/// Reserved discovery method name.
pub const DISCOVER_METHOD: &str = "rpc.discover";

/// Root object of an OpenRPC document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub openrpc: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub methods: Vec<MethodDescriptor>,
}

impl DiscoveryDocument {
    /// The single server this service is reachable at.
    pub fn server(&self) -> Option<&Server> {
        self.servers.first()
    }

    /// Look up a method by wire name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::new("OpenRPC contract", "0.1.1")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDoc {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExternalDoc {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_docs: Vec<ExternalDoc>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            summary: None,
            external_docs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamStructure {
    #[default]
    ByName,
    ByPosition,
    Either,
}

/// Discovery projection of one registered method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params_structure: ParamStructure,
    pub params: Value,
    pub result: Value,
    /// Permission roles as `{name}` tags, then documentation tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub external_docs: Vec<ExternalDoc>,
    #[serde(
        rename = "x-required-roles",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required_roles: Vec<Role>,
    /// Always published by this crate's registry. `None` for foreign documents.
    #[serde(
        rename = "x-notification",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification: Option<bool>,
}

impl MethodDescriptor {
    /// Roles required to call the method.
    ///
    /// Prefers the explicit `x-required-roles` list. Documents without it
    /// fall back to tag names, which may include plain documentation tags.
    pub fn permissions(&self) -> Permissions {
        if self.required_roles.is_empty() {
            Permissions::new(self.tags.iter().map(|tag| Role::new(tag.name.clone())))
        } else {
            Permissions::new(self.required_roles.iter().cloned())
        }
    }

    /// True if the method is a notification.
    ///
    /// The `x-notification` marker wins. Documents without it are classified
    /// by their `{"type": "null"}` result.
    pub fn is_notification(&self) -> bool {
        self.notification.unwrap_or_else(|| self.result == null_schema())
    }
}

/// Result schema published for methods without a response.
pub fn null_schema() -> Value {
    json!({ "type": "null" })
}
