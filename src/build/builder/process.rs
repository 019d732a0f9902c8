//! External process execution.
//!
//! The pipeline talks to processes through [`CommandRunner`] so the
//! orchestrator can be exercised without the editor, fastlane or pkgbuild
//! installed. [`SystemRunner`] is the real implementation.

use crate::build::{CommandLine, Error, Result};
use std::{collections::VecDeque, future::Future, path::PathBuf, process::Stdio};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

/// Number of trailing output lines kept for failure messages.
const CAPTURED_TAIL_LINES: usize = 40;

/// Runs one external command to completion.
///
/// Implementations must not return until the process has exited. A non-zero
/// exit is reported as [`Error::ProcessFailed`].
pub trait CommandRunner {
    /// Executes `command` and waits for it to exit.
    fn run(&self, command: &CommandLine) -> impl Future<Output = Result<()>> + Send;
}

/// Spawns real processes with tokio.
///
/// Stdout is echoed line by line as it arrives; stderr is echoed and its
/// tail captured for the failure message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Resolves bare program names through `PATH`; explicit paths are used as-is.
    fn resolve_program(command: &CommandLine) -> Result<PathBuf> {
        if command.program.components().count() > 1 {
            return Ok(command.program.clone());
        }
        which::which(&command.program).map_err(|e| Error::ToolNotFound {
            tool: command.name(),
            reason: e.to_string(),
        })
    }
}

fn push_tail(tail: &mut VecDeque<String>, line: String) {
    if tail.len() == CAPTURED_TAIL_LINES {
        tail.pop_front();
    }
    tail.push_back(line);
}

/// Echoes every line of `pipe` until EOF and returns the captured tail.
///
/// Lines are decoded lossily; tool output is not guaranteed to be UTF-8 and
/// the pipe must stay open until the child exits.
async fn drain<P>(pipe: Option<P>, echo: impl Fn(&str)) -> VecDeque<String>
where
    P: AsyncRead + Unpin,
{
    let mut tail = VecDeque::new();
    let Some(pipe) = pipe else {
        return tail;
    };

    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                echo(&line);
                push_tail(&mut tail, line);
            }
            Err(e) => {
                log::debug!("Stopped reading process output: {e}");
                break;
            }
        }
    }
    tail
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandLine) -> Result<()> {
        let program = Self::resolve_program(command)?;
        log::debug!("Running {command}");

        let mut child = Command::new(&program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command.to_string(),
                error,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes concurrently so neither blocks the child.
        let (stdout_tail, stderr_tail) = tokio::join!(
            drain(stdout, |line| println!("{line}")),
            drain(stderr, |line| eprintln!("{line}")),
        );

        let status = child.wait().await.map_err(|error| Error::CommandFailed {
            command: command.to_string(),
            error,
        })?;

        if status.success() {
            return Ok(());
        }

        let tail = if stderr_tail.is_empty() {
            stdout_tail
        } else {
            stderr_tail
        };
        let message = if tail.is_empty() {
            "process produced no output".to_string()
        } else {
            Vec::from(tail).join("\n")
        };

        Err(Error::ProcessFailed {
            command: command.name(),
            exit_code: status.code(),
            message,
        })
    }
}
