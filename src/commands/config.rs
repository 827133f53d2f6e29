use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::Config;

const DEFAULT_CONFIG: &str = r#"# elm-postiche configuration

[engine]
# Program and arguments that start the documentation worker.
# The worker reads one JSON message per line on stdin and answers on stdout.
command = ["node", "worker.js"]

[cache]
# Elm release whose package cache is searched ($ELM_HOME/<elm_version>/packages)
elm_version = "0.19.1"

[output]
# Where `generate` writes index.html, README.md and the module pages
dir = "output"
"#;

pub fn run(init: bool, explicit: Option<&Path>) -> Result<()> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if init {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, DEFAULT_CONFIG)?;
        info!("Created config file at: {}", config_path.display());
    } else if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        println!("Config file: {}\n", config_path.display());
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run `elm-postiche config --init` to create one at:");
        println!("  {}", config_path.display());
        println!("\nOr use environment variables:");
        println!("  ELM_POSTICHE_ENGINE=\"node worker.js\"");
        println!("  ELM_HOME=~/.elm");
    }

    Ok(())
}
