use openrpc_kit_client::Client;
use serde_json::Value;
use tracing::info;

use crate::cmd::{discovery_url, CallArgs, Settings};
use crate::exit::{client_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::print_value;

pub async fn run(args: CallArgs, settings: &Settings) -> CliResult<i32> {
    let params = parse_params(args.params.as_deref())?;

    let client = Client::create_with_config(
        &discovery_url(&args.url),
        settings.transport()?,
        settings.client.clone(),
    )
    .await
    .map_err(|err| client_error("discovery failed", err))?;

    let result = client
        .call(&args.name, params)
        .await
        .map_err(|err| client_error(&format!("call {} failed", args.name), err))?;

    let notification = client
        .method(&args.name)
        .is_some_and(|handle| handle.is_notification());
    if notification {
        info!(method = %args.name, "notification sent");
    } else {
        print_value(&result, settings.format);
    }

    Ok(SUCCESS)
}

fn parse_params(raw: Option<&str>) -> CliResult<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|err| CliError::new(DATA_INVALID, format!("invalid --params JSON: {err}"))),
    }
}
