use openrpc_kit_client::Client;
use openrpc_kit_protocol::snake_to_camel;
use tracing::debug;

use crate::cmd::{discovery_url, DiscoverArgs, Settings};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, print_methods, MethodRow, OutputFormat};

pub async fn run(args: DiscoverArgs, settings: &Settings) -> CliResult<i32> {
    let url = discovery_url(&args.url);
    debug!(url = %url, "fetching discovery document");

    let discovered =
        Client::discover_with_config(&url, settings.transport()?, settings.client.clone())
            .await
            .map_err(|err| client_error("discovery failed", err))?;
    let document = discovered.document();

    match settings.format {
        OutputFormat::Json => print_json(document, false),
        OutputFormat::Pretty | OutputFormat::Raw => print_json(document, true),
        OutputFormat::Table => {
            println!("{} {}", document.info.title, document.info.version);
            if let Some(server) = document.server() {
                println!("server: {}", server.url);
            }
            let rows: Vec<MethodRow> = document
                .methods
                .iter()
                .map(|method| MethodRow::new(&snake_to_camel(&method.name), method))
                .collect();
            print_methods(&rows, OutputFormat::Table);
        }
    }

    Ok(SUCCESS)
}
