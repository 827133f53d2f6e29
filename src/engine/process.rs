use serde::Serialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use super::{async_trait, Engine, EngineError, Inbound, InitMessage, Outbound};
use crate::core::Flags;

/// Engine running as a child process, one JSON message per line on stdin/stdout
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<Lines<BufReader<ChildStdout>>>,
}

impl ProcessEngine {
    pub fn new(command: &[String]) -> Result<Self, EngineError> {
        let (program, args) = command.split_first().ok_or(EngineError::EmptyCommand)?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            child: None,
            stdin: None,
            stdout: None,
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn write_line<T: Serialize>(&mut self, message: &T) -> Result<(), EngineError> {
        let stdin = self.stdin.as_mut().ok_or(EngineError::NotStarted)?;

        let mut line = serde_json::to_vec(message).map_err(EngineError::Encode)?;
        line.push(b'\n');

        stdin.write_all(&line).await?;
        stdin.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Engine for ProcessEngine {
    fn name(&self) -> &str {
        std::path::Path::new(&self.program)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.program)
    }

    async fn init(&mut self, flags: &Flags) -> Result<(), EngineError> {
        let command = self.command_line();
        debug!("Spawning engine: {}", command);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn { command, source })?;

        self.stdin = child.stdin.take();
        self.stdout = child.stdout.take().map(|out| BufReader::new(out).lines());
        self.child = Some(child);

        self.write_line(&InitMessage { flags }).await
    }

    async fn recv(&mut self) -> Result<Option<Outbound>, EngineError> {
        let stdout = self.stdout.as_mut().ok_or(EngineError::NotStarted)?;

        while let Some(line) = stdout.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Engine message: {} bytes", line.len());
            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| EngineError::Decode {
                    line: line.to_string(),
                    source,
                });
        }

        Ok(None)
    }

    async fn send(&mut self, message: Inbound) -> Result<(), EngineError> {
        self.write_line(&message).await
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        // Closing stdin lets a well-behaved worker exit on its own
        self.stdin = None;
        self.stdout = None;

        if let Some(mut child) = self.child.take() {
            match child.try_wait()? {
                Some(status) => debug!("Engine exited with {}", status),
                None => {
                    if let Err(e) = child.kill().await {
                        debug!("Failed to stop engine: {}", e);
                    }
                }
            }
        }

        Ok(())
    }
}
