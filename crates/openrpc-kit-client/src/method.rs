use openrpc_kit_protocol::{
    mint_id, notification_envelope, request_envelope, requires_id, response_envelope,
    snake_to_camel, HttpMethod, MethodDescriptor, Notification, Permissions, Request, Route,
};
use openrpc_kit_schema::Schema;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;

/// A callable method rebuilt from its discovery descriptor.
#[derive(Debug, Clone)]
pub struct MethodHandle {
    exposed: String,
    descriptor: MethodDescriptor,
    url: String,
    input: Schema,
    output: Option<Schema>,
}

impl MethodHandle {
    pub(crate) fn build(
        descriptor: MethodDescriptor,
        server_url: &str,
        config: &ClientConfig,
    ) -> Result<Self> {
        let params = Schema::from_value_with_config(descriptor.params.clone(), &config.schema())?;

        let (input, output) = if descriptor.is_notification() {
            (notification_envelope(&descriptor.name, &params)?, None)
        } else {
            let result = Schema::from_value(descriptor.result.clone())?;
            (
                request_envelope(&descriptor.name, &params)?,
                Some(response_envelope(&result)?),
            )
        };

        Ok(Self {
            exposed: snake_to_camel(&descriptor.name),
            url: Route::new(HttpMethod::Post, &descriptor.name).url(server_url),
            descriptor,
            input,
            output,
        })
    }

    /// Wire name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Name the client exposes the method under.
    pub fn exposed_name(&self) -> &str {
        &self.exposed
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True when the input envelope does not require an id.
    pub fn is_notification(&self) -> bool {
        !requires_id(&self.input)
    }

    pub fn permissions(&self) -> Permissions {
        self.descriptor.permissions()
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input
    }

    pub fn output_schema(&self) -> Option<&Schema> {
        self.output.as_ref()
    }

    /// Build the outbound envelope, minting an id for requests.
    ///
    /// `Value::Null` params are left out of the envelope.
    pub(crate) fn envelope(&self, params: Value) -> Result<(Option<String>, Value)> {
        let params = (!params.is_null()).then_some(params);

        if self.is_notification() {
            let envelope = serde_json::to_value(Notification::new(self.name(), params))?;
            Ok((None, envelope))
        } else {
            let id = mint_id();
            let envelope = serde_json::to_value(Request::new(self.name(), id.clone(), params))?;
            Ok((Some(id), envelope))
        }
    }
}
