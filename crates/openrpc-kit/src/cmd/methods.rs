use openrpc_kit_client::Client;

use crate::cmd::{discovery_url, MethodsArgs, Settings};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_methods, MethodRow};

pub async fn run(args: MethodsArgs, settings: &Settings) -> CliResult<i32> {
    let client = Client::create_with_config(
        &discovery_url(&args.url),
        settings.transport()?,
        settings.client.clone(),
    )
    .await
    .map_err(|err| client_error("discovery failed", err))?;

    let rows: Vec<MethodRow> = client
        .methods()
        .map(|handle| MethodRow::new(handle.exposed_name(), handle.descriptor()))
        .collect();
    print_methods(&rows, settings.format);

    Ok(SUCCESS)
}
