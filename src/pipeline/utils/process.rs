//! External process execution for pipeline stages.
//!
//! Children run with piped stdout/stderr. Both streams are copied byte for byte to
//! this process's own stdout/stderr as they arrive, so the operator sees exactly
//! what the tool printed; the tail of stderr is also kept for the error value.

use crate::pipeline::error::{Failure, StageResult};
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Number of trailing stderr lines attached to a failure.
pub const DIAGNOSTIC_TAIL_LINES: usize = 40;

/// A fully specified external command.
#[derive(Debug)]
pub struct ToolCommand {
    program: std::path::PathBuf,
    args: Vec<std::ffi::OsString>,
    current_dir: Option<std::path::PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[std::ffi::OsString] {
        &self.args
    }

    /// Command line rendered for messages.
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }

    /// Runs the command to completion, surfacing its output.
    ///
    /// Returns `Ok(())` only on a zero exit status. Dropping the returned future
    /// before it completes kills the child.
    pub async fn run(&self) -> StageResult<()> {
        let command_line = self.display();
        log::debug!("Running: {}", command_line);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| Failure::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes while waiting so a chatty child never blocks on a full pipe.
        let (_, stderr_tail, status) = tokio::join!(
            async {
                if let Some(stdout) = stdout {
                    forward(stdout, tokio::io::stdout(), None).await;
                }
            },
            async {
                let mut tail = VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES);
                if let Some(stderr) = stderr {
                    forward(stderr, tokio::io::stderr(), Some(&mut tail)).await;
                }
                tail
            },
            child.wait()
        );

        let status = status.map_err(|source| Failure::Wait {
            command: command_line.clone(),
            source,
        })?;

        check_status(&command_line, status, stderr_tail)
    }
}

fn check_status(
    command_line: &str,
    status: ExitStatus,
    stderr_tail: VecDeque<String>,
) -> StageResult<()> {
    if status.success() {
        log::debug!("`{}` finished successfully", command_line);
        return Ok(());
    }

    let diagnostics = if stderr_tail.is_empty() {
        None
    } else {
        Some(Vec::from(stderr_tail).join("\n"))
    };

    Err(Failure::ExitStatus {
        command: command_line.to_string(),
        code: status.code(),
        diagnostics,
    })
}

/// Copies `reader` to `writer` unchanged, optionally remembering the last lines.
async fn forward<R, W>(reader: R, mut writer: W, mut tail: Option<&mut VecDeque<String>>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if let Err(e) = writer.write_all(&line).await {
                    log::debug!("Failed to forward tool output: {}", e);
                }
                let _ = writer.flush().await;

                if let Some(tail) = tail.as_deref_mut() {
                    if tail.len() == DIAGNOSTIC_TAIL_LINES {
                        tail.pop_front();
                    }
                    let text = String::from_utf8_lossy(&line);
                    tail.push_back(text.trim_end_matches(['\r', '\n']).to_string());
                }
            }
            Err(e) => {
                log::debug!("Stopped reading tool output: {}", e);
                break;
            }
        }
    }
}
