//! External simulator process over stdin/stdout

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use super::{ProtocolStream, StreamError};

/// How to launch the simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory, usually a Showdown checkout
    pub cwd: Option<PathBuf>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            args: vec!["pokemon-showdown".to_string(), "simulate-battle".to_string()],
            cwd: None,
        }
    }
}

pub struct ProcessStream {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    closed: bool,
}

impl ProcessStream {
    /// Start the simulator; it is killed when the stream is dropped
    pub fn spawn(config: &ProcessConfig) -> Result<Self, StreamError> {
        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(cwd) = &config.cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(StreamError::Spawn)?;
        let stdin = child.stdin.take().ok_or(StreamError::Closed)?;
        let stdout = child.stdout.take().ok_or(StreamError::Closed)?;
        debug!(program = %config.program, pid = ?child.id(), "engine process started");

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
            closed: false,
        })
    }
}

#[async_trait]
impl ProtocolStream for ProcessStream {
    async fn write(&mut self, line: &str) -> Result<(), StreamError> {
        let stdin = self.stdin.as_mut().ok_or(StreamError::Closed)?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn next_line(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        match self.stdout.next_line().await {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                self.closed = true;
                None
            }
            Err(e) => {
                warn!("engine output failed: {e}");
                self.closed = true;
                None
            }
        }
    }

    async fn destroy(&mut self) {
        if self.closed && self.stdin.is_none() {
            return;
        }
        self.closed = true;
        self.stdin = None;
        if let Err(e) = self.child.kill().await {
            debug!("engine process already gone: {e}");
        }
    }
}
