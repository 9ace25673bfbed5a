use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("openrpc-kit {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: openrpc-kit");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("openrpc: {}", openrpc_kit_protocol::OPENRPC_VERSION);
    println!("jsonrpc: {}", openrpc_kit_protocol::JSONRPC_VERSION);
    println!(
        "target: {}",
        option_env!("OPENRPC_KIT_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "features: client={}, server={}, cli=true",
        cfg!(feature = "client"),
        cfg!(feature = "server")
    );

    Ok(SUCCESS)
}
