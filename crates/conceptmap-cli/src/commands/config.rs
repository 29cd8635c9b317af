//! Config command for managing view defaults

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};
use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one config value
    Get {
        /// Config key (max_distance, bidirectional, format)
        key: String,
    },
    /// Change one config value
    Set {
        /// Config key (max_distance, bidirectional, format)
        key: String,
        /// New value
        value: String,
    },
    /// Show every config value
    List,
    /// Show the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            let Some(value) = ctx.config.get(key) else {
                anyhow::bail!(
                    "Unknown config key: {} (available: {})",
                    key,
                    Config::keys().join(", ")
                );
            };
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = ctx.config.clone();
            config.set(key, value)?;
            config.save()?;
            tracing::info!("Updated config key {}", key);
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::List => match ctx.format {
            OutputFormat::Json => println!("{}", to_json(&ctx.config)?),
            OutputFormat::Table => {
                println!("# {}", config_file_path().display());
                for key in Config::keys() {
                    let value = ctx.config.get(key).unwrap_or_default();
                    println!("{} = {}", key, value);
                }
            }
        },
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save()?;
            println!("Created config file at {}", path.display());
        }
    }

    Ok(())
}
