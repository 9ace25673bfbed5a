use std::future::Future;
use std::time::Duration;

use clap::{Args, Subcommand};
use openrpc_kit_client::{ClientConfig, HttpTransport};
use openrpc_kit_protocol::DISCOVER_METHOD;

use crate::exit::{transport_error, CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod call;
pub mod discover;
pub mod methods;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and print a service's discovery document.
    Discover(DiscoverArgs),
    /// List the methods a service exposes.
    Methods(MethodsArgs),
    /// Call a method by its exposed name.
    Call(CallArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Options shared by every networked command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: OutputFormat,
    pub client: ClientConfig,
}

impl Settings {
    pub fn new(format: OutputFormat, timeout: &str, strict: bool) -> CliResult<Self> {
        let client = ClientConfig::default()
            .with_timeout(parse_timeout(timeout)?)
            .with_strict_mode(strict);
        Ok(Self { format, client })
    }

    pub fn transport(&self) -> CliResult<HttpTransport> {
        HttpTransport::new(&self.client).map_err(|err| transport_error("http client", err))
    }
}

pub fn run(command: Command, settings: &Settings) -> CliResult<i32> {
    match command {
        Command::Discover(args) => block_on(discover::run(args, settings)),
        Command::Methods(args) => block_on(methods::run(args, settings)),
        Command::Call(args) => block_on(call::run(args, settings)),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Service base URL or its rpc.discover URL.
    #[arg(env = "OPENRPC_KIT_URL")]
    pub url: String,
}

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Service base URL or its rpc.discover URL.
    #[arg(env = "OPENRPC_KIT_URL")]
    pub url: String,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Service base URL or its rpc.discover URL.
    #[arg(env = "OPENRPC_KIT_URL")]
    pub url: String,
    /// Exposed method name (e.g. getUser).
    pub name: String,
    /// JSON params.
    #[arg(long)]
    pub params: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn block_on<F>(future: F) -> CliResult<i32>
where
    F: Future<Output = CliResult<i32>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))?;
    runtime.block_on(future)
}

/// Accept either the service base URL or the full discovery URL.
pub fn discovery_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with(&format!("/{DISCOVER_METHOD}")) {
        trimmed.to_string()
    } else {
        format!("{trimmed}/{DISCOVER_METHOD}")
    }
}

fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, millis) = match input.strip_suffix("ms") {
        Some(number) => (number, true),
        None => (input.strip_suffix('s').unwrap_or(input), false),
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
