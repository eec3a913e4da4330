//! CLI interface for sending commands to a CyREST service

use super::config::{ClientConfig, DEFAULT_RELAY_CHANNEL, DEFAULT_RELAY_URL};
use super::dispatcher::CyRestClient;
use super::error::CyError;
use clap::{Parser, Subcommand};
use cyrest::DEFAULT_BASE_URL;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cyrest")]
#[command(about = "Send commands to a CyREST service, directly or through a relay")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Command service root, e.g. http://localhost:1234/v1
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long, default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,
    #[arg(long, default_value_t = DEFAULT_RELAY_CHANNEL)]
    pub channel: u32,
    /// Give up on any single HTTP call after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Treat this session as interactive: probe the service and fall back to the relay
    #[arg(long)]
    pub interactive: bool,
    /// Log request and response content, not just request lines
    #[arg(long)]
    pub log_content: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run a command through the plain-text endpoint
    Get {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Run a command through the JSON endpoint and print its data
    Post {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// List available commands below a namespace
    Help {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Report how the service is reached: direct, relayed or unreachable
    Probe,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .with_relay_url(&self.relay_url)
            .with_channel(self.channel)
            .with_request_timeout(self.timeout_secs.map(Duration::from_secs))
            .with_log_content(self.log_content)
    }
}

pub async fn handle_cli_command(client: &CyRestClient, command: Commands) -> Result<(), CyError> {
    match command {
        Commands::Get { command } => {
            for line in client.commands_get(&command.join(" ")).await? {
                println!("{line}");
            }
        }
        Commands::Post { command } => {
            let data = client.commands_post(&command.join(" ")).await?;
            let rendered = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
            println!("{rendered}");
        }
        Commands::Help { command } => {
            for line in client.commands_help(&command.join(" ")).await? {
                println!("{line}");
            }
        }
        Commands::Probe => {
            let mode = client.resolve_connectivity().await;
            println!("{} is {mode}", client.base_url());
        }
    }
    Ok(())
}
