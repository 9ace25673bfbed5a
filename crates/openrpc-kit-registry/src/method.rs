use openrpc_kit_protocol::{
    notification_envelope, null_schema, request_envelope, response_envelope, ExternalDoc,
    MethodDescriptor, ParamStructure, Permissions, Role, Tag,
};
use openrpc_kit_schema::Schema;

use crate::contract::{Contract, HttpMethod, Route};
use crate::error::Result;

const DEFAULT_SUMMARY: &str = "No summary";

/// Whether a method answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Answered with a Response.
    Request,
    /// Fire-and-forget, never answered.
    Notification,
}

/// What a caller supplies when registering a method.
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    pub(crate) params: Option<Schema>,
    pub(crate) result: Option<Schema>,
    pub(crate) permissions: Option<Permissions>,
    pub(crate) description: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) external_docs: Vec<ExternalDoc>,
    pub(crate) tags: Vec<Tag>,
}

impl MethodSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of the `params` member.
    pub fn params(mut self, schema: Schema) -> Self {
        self.params = Some(schema);
        self
    }

    /// Schema of the `result` member. Requests only.
    pub fn result(mut self, schema: Schema) -> Self {
        self.result = Some(schema);
        self
    }

    /// Roles allowed to call the method. Defaults to `anyone`.
    pub fn permissions<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.permissions = Some(Permissions::new(roles));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn external_doc(mut self, doc: ExternalDoc) -> Self {
        self.external_docs.push(doc);
        self
    }

    /// Free-text documentation tag, published after the permission tags.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// A registered method. Immutable once registered.
#[derive(Debug, Clone)]
pub struct MethodDefinition {
    pub name: String,
    pub kind: MethodKind,
    pub params: Schema,
    /// `None` for notifications.
    pub result: Option<Schema>,
    pub permissions: Permissions,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub external_docs: Vec<ExternalDoc>,
    pub tags: Vec<Tag>,
}

impl MethodDefinition {
    pub fn is_notification(&self) -> bool {
        self.kind == MethodKind::Notification
    }

    /// The contract the transport layer enforces for this method.
    pub fn contract(&self) -> Result<Contract> {
        let route = Route::new(HttpMethod::Post, &self.name);
        let contract = match (&self.kind, &self.result) {
            (MethodKind::Request, Some(result)) => Contract {
                name: self.name.clone(),
                kind: MethodKind::Request,
                route,
                input: request_envelope(&self.name, &self.params)?,
                output: Some(response_envelope(result)?),
            },
            _ => Contract {
                name: self.name.clone(),
                kind: MethodKind::Notification,
                route,
                input: notification_envelope(&self.name, &self.params)?,
                output: None,
            },
        };
        Ok(contract)
    }

    /// Discovery document projection.
    pub fn descriptor(&self) -> MethodDescriptor {
        let mut tags: Vec<Tag> = self
            .permissions
            .iter()
            .map(|role| Tag::new(role.as_str()))
            .collect();
        tags.extend(self.tags.iter().cloned());

        MethodDescriptor {
            name: self.name.clone(),
            params_structure: ParamStructure::ByName,
            params: self.params.to_json_schema(),
            result: self
                .result
                .as_ref()
                .map(Schema::to_json_schema)
                .unwrap_or_else(null_schema),
            tags,
            description: self.description.clone().unwrap_or_default(),
            summary: self
                .summary
                .clone()
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            external_docs: self.external_docs.clone(),
            required_roles: self.permissions.roles().to_vec(),
            notification: Some(self.is_notification()),
        }
    }
}
