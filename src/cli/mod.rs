//! Command-line interface definitions.

pub mod check;
pub mod deploy;
pub mod invoke;
pub mod output;
pub mod params;
pub mod synth;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Mlstack - deployment orchestration for a hosted-model inference demo.
#[derive(Parser, Debug)]
#[command(name = "mlstack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate ordering and print the deployment plan
    Synth(ConfigPathArg),

    /// Materialize all units against the configured store
    Deploy(ConfigPathArg),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Inspect and seed the parameter store
    #[command(subcommand)]
    Params(ParamsCommand),

    /// Run one request handler locally
    Invoke(InvokeArgs),
}

/// Subcommands for `mlstack check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Subcommands for `mlstack params`
#[derive(Subcommand, Debug)]
pub enum ParamsCommand {
    /// List well-known parameters and their current values
    List(ConfigPathArg),
    /// Fetch one parameter by key
    Get {
        key: String,
        #[command(flatten)]
        config: ConfigPathArg,
    },
    /// Upsert one parameter (e.g. bump the model version tag)
    Put {
        key: String,
        value: String,
        #[command(flatten)]
        config: ConfigPathArg,
    },
}

#[derive(Parser, Debug)]
pub struct InvokeArgs {
    /// Route to invoke: generate, ping, vote, or db-init
    pub route: String,

    /// Request body (JSON)
    #[arg(long)]
    pub body: Option<String>,

    /// HTTP method override (defaults to the route's natural method)
    #[arg(long)]
    pub method: Option<String>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Dispatch a parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synth(args) => {
            let config = load(&args)?;
            synth::execute(&config).await
        }
        Commands::Deploy(args) => {
            let config = load(&args)?;
            deploy::execute(&config).await
        }
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
        Commands::Params(command) => params::execute(command).await,
        Commands::Invoke(args) => {
            let config = load(&args.config)?;
            invoke::execute(&config, &args).await
        }
    }
}

fn load(args: &ConfigPathArg) -> Result<Config> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    Ok(config)
}
