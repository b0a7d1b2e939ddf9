//! Refract CLI - convert shadcn-style React components to Svelte and Vue.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use refract_adapters::Target;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod format;

#[derive(Parser)]
#[command(name = "refract")]
#[command(about = "Convert shadcn-style React components to Svelte and Vue")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to refract.toml config file
    #[arg(short, long, default_value = "refract.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a component file or a directory of components
    Convert {
        /// File or directory to convert
        path: PathBuf,

        /// Output framework (svelte or vue)
        #[arg(short, long)]
        target: Target,

        /// Output directory (defaults to config or "converted")
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Emit Svelte 4 syntax instead of runes
        #[arg(long)]
        legacy: bool,

        /// Run prettier over the generated files
        #[arg(long)]
        format: bool,
    },

    /// Print what the parser extracts from a file as JSON
    Inspect {
        /// Component source file
        file: PathBuf,
    },

    /// Write a default refract.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Convert {
            path,
            target,
            out,
            legacy,
            format,
        } => {
            let args = commands::convert::ConvertArgs {
                path,
                target,
                out,
                legacy,
                format,
            };
            commands::convert::run(&cli.config, args).await?;
        }
        Commands::Inspect { file } => {
            commands::inspect::run(&file)?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
    }

    Ok(())
}
