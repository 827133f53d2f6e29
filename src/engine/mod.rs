mod process;

use anyhow::{Context, Result};
pub use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{AbortSignal, BundleOutput, Flags};

pub use process::ProcessEngine;

/// Messages the engine emits on its outbound ports
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "port", content = "value", rename_all = "camelCase")]
pub enum Outbound {
    /// Request for raw documentation JSON of a specifier
    DocsFinder(String),
    /// A finished documentation bundle
    DocsWriter(BundleOutput),
    /// Fatal condition; terminal
    Abort(AbortSignal),
}

/// Messages the host pushes into the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "port", content = "value", rename_all = "camelCase")]
pub enum Inbound {
    /// Parsed documentation data answering a `docsFinder` request
    ModuleLoader(serde_json::Value),
}

/// First message sent to an engine
#[derive(Debug, Serialize)]
pub struct InitMessage<'a> {
    pub flags: &'a Flags,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no engine command configured")]
    EmptyCommand,

    #[error("failed to start engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine was used before it was initialized")]
    NotStarted,

    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine sent an undecodable message {line:?}: {source}")]
    Decode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode message for engine: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("engine stopped before reporting a bundle or an abort")]
    Disconnected,
}

/// Boundary to a documentation engine
#[async_trait]
pub trait Engine: Send {
    /// Get the engine name
    fn name(&self) -> &str;

    /// Start the engine with its initialization flags. Called exactly once.
    async fn init(&mut self, flags: &Flags) -> Result<(), EngineError>;

    /// Wait for the next outbound message; `None` once the engine has gone away
    async fn recv(&mut self) -> Result<Option<Outbound>, EngineError>;

    /// Push a message into the engine
    async fn send(&mut self, message: Inbound) -> Result<(), EngineError>;

    /// Stop the engine after a terminal message
    async fn shutdown(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Build the engine for a configured command line
pub fn get_engine(command: &[String]) -> Result<Box<dyn Engine>> {
    match command.first().map(String::as_str) {
        Some(program) if !program.trim().is_empty() => Ok(Box::new(ProcessEngine::new(command)?)),
        _ => {
            anyhow::bail!("No engine command configured. Pass --engine or set [engine].command in the config file")
        }
    }
}

/// Split an engine command given as a single string, honoring shell quoting
pub fn parse_command(command: &str) -> Result<Vec<String>> {
    shell_words::split(command)
        .with_context(|| format!("Invalid engine command {:?}", command))
}
