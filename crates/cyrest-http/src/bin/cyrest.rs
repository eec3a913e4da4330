//! CyREST command client binary

use clap::Parser;
use cyrest_http::cli::{Cli, handle_cli_command};
use cyrest_http::{CyRestClient, FixedEnvironment};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    cyrest::telemetry::init();
    let cli = Cli::parse();

    let client = match CyRestClient::new(cli.client_config()) {
        Ok(client) => client.with_environment(Arc::new(FixedEnvironment(cli.interactive))),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = handle_cli_command(&client, cli.command).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
