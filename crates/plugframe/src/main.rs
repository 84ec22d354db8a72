mod cli;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

/// Plugframe: plugin framework control tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    /// Directory holding installed plugin records
    #[arg(long, global = true, value_name = "DIR")]
    storage: Option<PathBuf>,

    /// Framework properties file (.json, .yaml or .toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate version ranges
    Range {
        #[command(subcommand)]
        command: RangeCommand,
    },
    /// Manage installed plugins
    Plugin {
        #[command(subcommand)]
        command: PluginCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RangeCommand {
    /// Print whether VERSION lies inside RANGE
    Check { range: String, version: String },
    /// Print whether INNER lies completely inside OUTER
    Contains { outer: String, inner: String },
    /// Print the canonical form of RANGE
    Parse { range: String },
}

#[derive(Subcommand, Debug)]
enum PluginCommand {
    /// List installed plugins
    List {},
    /// Install a plugin from its JSON manifest
    Install {
        /// Path of the manifest file
        manifest: PathBuf,
        /// Install location to record (defaults to the manifest path)
        #[arg(long)]
        location: Option<String>,
    },
    /// Resolve the highest installed version of a plugin
    Resolve {
        /// Symbolic name of the plugin
        name: String,
    },
    /// Uninstall every installed version of a plugin
    Uninstall {
        /// Symbolic name of the plugin
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    let outcome = match args.command {
        Commands::Range { command } => match command {
            RangeCommand::Check { range, version } => cli::range_check(&range, &version),
            RangeCommand::Contains { outer, inner } => cli::range_contains(&outer, &inner),
            RangeCommand::Parse { range } => cli::range_parse(&range),
        },
        Commands::Plugin { command } => {
            let framework = match cli::open_framework(args.storage.as_deref(), args.config.as_deref()).await {
                Ok(framework) => framework,
                Err(e) => {
                    error!("Failed to start framework: {}", e);
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let outcome = match command {
                PluginCommand::List {} => cli::plugin_list(&framework).await,
                PluginCommand::Install { manifest, location } => {
                    cli::plugin_install(&framework, &manifest, location.as_deref()).await
                }
                PluginCommand::Resolve { name } => cli::plugin_resolve(&framework, &name).await,
                PluginCommand::Uninstall { name } => cli::plugin_uninstall(&framework, &name).await,
            };
            if let Err(e) = framework.shutdown().await {
                error!("Error during framework shutdown: {}", e);
            }
            outcome
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
