//! Container runtime availability checking.

use super::RuntimeKind;
use crate::error::RuntimeError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Timeout for the runtime info check (5 seconds)
pub const RUNTIME_INFO_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(target_os = "macos")]
const RUNTIME_START_HELP: &str = "Start Docker Desktop (or `podman machine start`)";

#[cfg(not(target_os = "macos"))]
const RUNTIME_START_HELP: &str =
    "Start the daemon: sudo systemctl start docker (podman needs no daemon)";

/// Checks that the runtime client is installed and its daemon answers.
///
/// # Returns
///
/// * `Ok(())` - Runtime is available
/// * `Err` - Client binary missing or daemon not responding
pub async fn check_runtime_available(kind: RuntimeKind) -> Result<(), RuntimeError> {
    let binary = kind.binary();

    let path = which::which(binary).map_err(|e| {
        RuntimeError::new(
            binary,
            format!(
                "{} not found in PATH: {}\n\
                 \n\
                 Install {} or set container.runtime in the config file.",
                binary, e, binary
            ),
        )
    })?;
    log::debug!("Using {} client at {}", binary, path.display());

    let status_result = timeout(
        RUNTIME_INFO_TIMEOUT,
        Command::new(&path)
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    match status_result {
        Err(_) => Err(RuntimeError::new(
            format!("{} info", binary),
            format!(
                "{} check timed out after {} seconds.\n\
                 \n\
                 {}",
                binary,
                RUNTIME_INFO_TIMEOUT.as_secs(),
                RUNTIME_START_HELP
            ),
        )),

        Ok(Ok(status)) if status.success() => Ok(()),

        Ok(Ok(status)) => Err(RuntimeError::new(
            format!("{} info", binary),
            format!(
                "{} is not responding (exit code: {}).\n\
                 \n\
                 {}",
                binary,
                status.code().unwrap_or(-1),
                RUNTIME_START_HELP
            ),
        )),

        Ok(Err(e)) => Err(RuntimeError::new(format!("{} info", binary), e.to_string())),
    }
}
