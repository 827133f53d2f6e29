use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod core;
mod engine;
mod output;

#[derive(Parser)]
#[command(name = "elm-postiche")]
#[command(
    author,
    version,
    about = "Generate Markdown documentation for Elm packages through a documentation worker"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "ELM_POSTICHE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate index.html, README.md and module pages for a package
    Generate {
        /// Where to generate the documentation into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package specification, <author>/<package>
        #[arg(short = 'p', long)]
        spec: Option<String>,

        /// Path of a JSON file containing the documentation info
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Look the documentation up in the Elm package cache at this version
        #[arg(long)]
        package_version: Option<String>,

        /// Command that starts the documentation worker
        #[arg(long, env = "ELM_POSTICHE_ENGINE")]
        engine: Option<String>,
    },

    /// Write module pages into a fresh scratch directory and print its path
    Preview {
        /// Package specification, <author>/<package>
        #[arg(long, default_value = "")]
        specifier: String,

        /// Documentation JSON handed to the worker
        #[arg(long, default_value = commands::preview::BUNDLED_DOCS)]
        docs: PathBuf,

        /// Directory the scratch directory is created in
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Command that starts the documentation worker
        #[arg(long, env = "ELM_POSTICHE_ENGINE")]
        engine: Option<String>,
    },

    /// Print where a package version lives in the local Elm cache
    Locate {
        author: String,
        project: String,
        #[arg(value_name = "VERSION")]
        package_version: String,
    },

    /// Show current configuration
    Config {
        /// Initialize a new config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for results
    let filter = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let code = dispatch(cli.command, cli.config, cli.verbose).await?;

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

async fn dispatch(command: Commands, config_path: Option<PathBuf>, verbose: bool) -> Result<i32> {
    let load_config = || core::Config::load(config_path.as_deref());

    match command {
        Commands::Generate {
            output,
            spec,
            docs,
            package_version,
            engine,
        } => {
            let config = load_config()?;
            commands::generate::run(commands::generate::GenerateArgs {
                output: output.unwrap_or(config.output.dir),
                spec,
                docs,
                package_version,
                engine: engine_command(engine, config.engine.command)?,
                elm_version: config.cache.elm_version,
                verbose,
            })
            .await
        }
        Commands::Preview {
            specifier,
            docs,
            output,
            engine,
        } => {
            let config = load_config()?;
            commands::preview::run(commands::preview::PreviewArgs {
                specifier,
                docs,
                output: output.unwrap_or(config.output.dir),
                engine: engine_command(engine, config.engine.command)?,
            })
            .await
        }
        Commands::Locate {
            author,
            project,
            package_version,
        } => {
            let config = load_config()?;
            commands::locate::run(
                core::PackageId::new(author, project, package_version),
                &config.cache.elm_version,
            )
        }
        Commands::Config { init } => {
            commands::config::run(init, config_path.as_deref())?;
            Ok(0)
        }
    }
}

/// `--engine` wins over the configured command
fn engine_command(flag: Option<String>, configured: Vec<String>) -> Result<Vec<String>> {
    match flag {
        Some(cmd) => engine::parse_command(&cmd),
        None => Ok(configured),
    }
}
