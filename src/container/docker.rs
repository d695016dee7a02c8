//! Container handle backed by the docker/podman command-line client.

use super::{ContainerHandle, OutputStream, RunRequest, RuntimeKind};
use crate::error::RuntimeError;
use async_trait::async_trait;
use bytes::Bytes;
use path_absolutize::Absolutize;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use uuid::Uuid;

/// Timeout for image pulls (30 minutes)
pub const PULL_TIMEOUT: Duration = Duration::from_secs(1800);

/// Timeout for short bookkeeping commands (create, rm, kill)
pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of stderr lines kept for error reports
const STDERR_TAIL: usize = 20;

/// Build container driven through the runtime CLI.
///
/// The container is created on the first run and removed only on request, so a finished
/// build container can be left behind for inspection.
#[derive(Debug)]
pub struct DockerContainer {
    runtime: RuntimeKind,
    program: PathBuf,
    image: String,
    name: String,
    run_timeout: Duration,
    id: Option<String>,
    removed: bool,
}

impl DockerContainer {
    /// Creates a handle; nothing is started until a command runs.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Runtime client to drive
    /// * `image` - Builder image reference
    /// * `run_timeout` - Upper bound for a single command run
    pub fn new(runtime: RuntimeKind, image: String, run_timeout: Duration) -> Self {
        Self {
            runtime,
            program: PathBuf::from(runtime.binary()),
            image,
            name: format!("isogen-{}", Uuid::new_v4()),
            run_timeout,
            id: None,
            removed: false,
        }
    }

    /// Runs the runtime client from `program` instead of looking it up on `PATH`
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Container name passed to the runtime
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds `create` arguments for a run request.
    ///
    /// Host paths are made absolute; the runtime rejects relative bind sources.
    pub fn create_args(&self, request: &RunRequest) -> Result<Vec<String>, RuntimeError> {
        let mut args = vec![
            "create".to_string(),
            "--name".to_string(),
            self.name.clone(),
        ];

        if request.stdin.is_some() {
            args.push("--interactive".to_string());
        }

        if request.privileged {
            args.push("--privileged".to_string());
        }

        for mount in &request.mounts {
            let source = mount.source.absolutize().map_err(|e| {
                RuntimeError::new(
                    format!("{} create", self.runtime),
                    format!("Cannot resolve volume source {}: {}", mount.source.display(), e),
                )
            })?;
            args.push("--volume".to_string());
            args.push(format!(
                "{}:{}",
                source.display(),
                mount.destination.display()
            ));
        }

        for var in &request.env {
            args.push("--env".to_string());
            args.push(var.clone());
        }

        args.push(self.image.clone());
        args.extend(request.args.iter().cloned());

        Ok(args)
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("{} {}", self.runtime.binary(), args.join(" "))
    }

    async fn create(&mut self, request: &RunRequest) -> Result<String, RuntimeError> {
        if let Some(id) = &self.id {
            return Err(RuntimeError::new(
                format!("{} create", self.runtime),
                format!(
                    "container {} already exists; a build container runs only once",
                    id
                ),
            ));
        }

        let args = self.create_args(request)?;
        let output = self.control(&args).await?;

        let id = String::from_utf8_lossy(&output).trim().to_string();
        if id.is_empty() {
            return Err(RuntimeError::new(
                self.command_line(&args),
                "runtime returned no container id",
            ));
        }

        log::debug!("Created container {} ({})", id, self.name);
        self.id = Some(id.clone());
        Ok(id)
    }

    /// Runs a short command and returns its stdout.
    async fn control(&self, args: &[String]) -> Result<Vec<u8>, RuntimeError> {
        let command = self.command_line(args);
        log::debug!("Running: {}", command);

        let output = tokio::time::timeout(
            CONTROL_TIMEOUT,
            Command::new(&self.program)
                .args(args)
                .stdin(Stdio::null())
                .output(),
        )
        .await
        .map_err(|_| {
            RuntimeError::new(
                command.clone(),
                format!("timed out after {} seconds", CONTROL_TIMEOUT.as_secs()),
            )
        })?
        .map_err(|e| RuntimeError::new(command.clone(), e.to_string()))?;

        if !output.status.success() {
            return Err(RuntimeError::new(
                command,
                format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(output.stdout)
    }

    /// Runs a long command, feeding stdin and draining stdout/stderr concurrently.
    ///
    /// With `capture` set, stdout is collected and returned; otherwise each line goes to the
    /// debug log.
    async fn execute(
        &self,
        args: Vec<String>,
        stdin: Option<Bytes>,
        capture: bool,
        limit: Duration,
    ) -> Result<Vec<u8>, RuntimeError> {
        let command = self.command_line(&args);
        log::debug!("Running: {}", command);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RuntimeError::new(command.clone(), e.to_string()))?;

        let stdin_pipe = child.stdin.take();
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let run = async {
            let (stdin_result, stdout_result, stderr_lines) = tokio::join!(
                async {
                    if let (Some(mut pipe), Some(data)) = (stdin_pipe, stdin) {
                        pipe.write_all(&data).await?;
                        pipe.shutdown().await?;
                    }
                    Ok::<(), std::io::Error>(())
                },
                async {
                    let mut captured = Vec::new();
                    if let Some(stdout) = stdout_pipe {
                        if capture {
                            let mut stdout = stdout;
                            stdout.read_to_end(&mut captured).await?;
                        } else {
                            drain_lines(stdout, |line| {
                                log::debug!("[{}] {}", self.name, line);
                            })
                            .await?;
                        }
                    }
                    Ok::<Vec<u8>, std::io::Error>(captured)
                },
                async {
                    let mut captured = Vec::new();
                    if let Some(stderr) = stderr_pipe {
                        let drained = drain_lines(stderr, |line| {
                            log::debug!("[{}] {}", self.name, line);
                            captured.push(line.to_string());
                        })
                        .await;
                        if let Err(e) = drained {
                            log::warn!("Failed to read {} stderr: {}", self.runtime, e);
                        }
                    }
                    captured
                }
            );
            let status = child.wait().await;
            (stdin_result, stdout_result, stderr_lines, status)
        };

        let (stdin_result, stdout_result, stderr_lines, status) =
            match tokio::time::timeout(limit, run).await {
                Ok(finished) => finished,
                Err(_elapsed) => {
                    log::warn!(
                        "{} timed out after {} seconds, terminating",
                        command,
                        limit.as_secs()
                    );
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill {} client: {}", self.runtime, e);
                    }
                    if let Some(id) = &self.id
                        && let Err(e) = self.control(&["kill".to_string(), id.clone()]).await
                    {
                        log::warn!("Failed to stop container {}: {}", id, e);
                    }
                    return Err(RuntimeError::new(
                        command,
                        format!("timed out after {} seconds", limit.as_secs()),
                    ));
                }
            };

        if let Err(e) = stdin_result
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(RuntimeError::new(
                command,
                format!("failed to write stdin: {}", e),
            ));
        }

        let status = status.map_err(|e| RuntimeError::new(command.clone(), e.to_string()))?;
        let stdout = stdout_result.map_err(|e| RuntimeError::new(command.clone(), e.to_string()))?;

        if !status.success() {
            let tail_start = stderr_lines.len().saturating_sub(STDERR_TAIL);
            return Err(RuntimeError::new(
                command,
                format!(
                    "exit code {}: {}",
                    status.code().unwrap_or(-1),
                    stderr_lines[tail_start..].join("\n")
                ),
            ));
        }

        Ok(stdout)
    }

    async fn start(&mut self, request: RunRequest, capture: bool) -> Result<Vec<u8>, RuntimeError> {
        let id = self.create(&request).await?;

        let mut args = vec!["start".to_string(), "--attach".to_string()];
        if request.stdin.is_some() {
            args.push("--interactive".to_string());
        }
        args.push(id);

        self.execute(args, request.stdin, capture, self.run_timeout)
            .await
    }
}

/// Reads `reader` to EOF and hands each line to `on_line`.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read.
async fn drain_lines<R, F>(reader: R, mut on_line: F) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\r', '\n']));
    }
}

#[async_trait]
impl ContainerHandle for DockerContainer {
    async fn pull_image(&mut self) -> Result<(), RuntimeError> {
        let args = vec!["pull".to_string(), self.image.clone()];
        self.execute(args, None, false, PULL_TIMEOUT).await?;
        Ok(())
    }

    async fn run_command(&mut self, request: RunRequest) -> Result<(), RuntimeError> {
        self.start(request, false).await?;
        Ok(())
    }

    async fn run_command_capture(
        &mut self,
        request: RunRequest,
    ) -> Result<OutputStream, RuntimeError> {
        let stdout = self.start(request, true).await?;
        let stream: OutputStream = Box::pin(Cursor::new(stdout));
        Ok(stream)
    }

    async fn remove_container(&mut self) -> Result<(), RuntimeError> {
        let Some(id) = self.id.clone() else {
            log::debug!("Container {} was never created, nothing to remove", self.name);
            return Ok(());
        };

        if self.removed {
            return Ok(());
        }

        self.control(&["rm".to_string(), "--force".to_string(), id])
            .await?;
        self.removed = true;
        Ok(())
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
