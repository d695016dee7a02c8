//! Container runtime integration for the ISO builder.
//!
//! The orchestrator only sees [`ContainerHandle`]: one build container and the operations
//! available on it. [`DockerContainer`] implements it on top of the `docker` or `podman`
//! command-line client.
//!
//! # Module Structure
//!
//! - `availability` - Runtime preflight (binary present, daemon responding)
//! - `docker` - CLI-backed container handle

mod availability;
mod docker;

pub use availability::check_runtime_available;
pub use docker::DockerContainer;

use crate::config::BuildConfig;
use crate::error::{IsogenError, Result, RuntimeError};
use crate::isogen::VolumeBind;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use tokio::io::AsyncRead;

/// Byte stream of a command's standard output
pub type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

/// One command to execute inside the build container
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Arguments passed to the image entrypoint; empty runs the default command
    pub args: Vec<String>,
    /// Data fed to the command's standard input
    pub stdin: Option<Bytes>,
    /// Environment variables, `KEY=VALUE`
    pub env: Vec<String>,
    /// Volume binds
    pub mounts: Vec<VolumeBind>,
    /// Run with extended privileges
    pub privileged: bool,
}

/// A single build container.
///
/// A handle belongs to one build and is not reused. Every operation may block on the
/// runtime; timeouts are the implementation's responsibility.
#[async_trait]
pub trait ContainerHandle: Send {
    /// Make the builder image available locally
    async fn pull_image(&mut self) -> std::result::Result<(), RuntimeError>;

    /// Run a command to completion. Output handling is up to the implementation.
    async fn run_command(&mut self, request: RunRequest) -> std::result::Result<(), RuntimeError>;

    /// Run a command and hand back its standard output
    async fn run_command_capture(
        &mut self,
        request: RunRequest,
    ) -> std::result::Result<OutputStream, RuntimeError>;

    /// Delete the container
    async fn remove_container(&mut self) -> std::result::Result<(), RuntimeError>;

    /// Runtime-assigned identifier, available once the container has been created
    fn id(&self) -> Option<&str>;
}

/// Supported container runtimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Docker CLI
    Docker,
    /// Podman CLI (docker-compatible)
    Podman,
}

impl RuntimeKind {
    /// Client binary name
    pub fn binary(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "docker",
            RuntimeKind::Podman => "podman",
        }
    }
}

impl FromStr for RuntimeKind {
    type Err = IsogenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "docker" => Ok(RuntimeKind::Docker),
            "podman" => Ok(RuntimeKind::Podman),
            other => Err(IsogenError::invalid_config(format!(
                "unsupported container runtime '{}' (supported: docker, podman)",
                other
            ))),
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Creates the container handle for a build
pub fn new_container(cfg: &BuildConfig) -> Result<Box<dyn ContainerHandle>> {
    let kind: RuntimeKind = cfg.runtime_kind.parse()?;

    if cfg.container_image_ref.is_empty() {
        return Err(IsogenError::invalid_config(
            "container image is not specified",
        ));
    }

    Ok(Box::new(DockerContainer::new(
        kind,
        cfg.container_image_ref.clone(),
        cfg.run_timeout,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;

    #[test]
    fn test_runtime_kind_parse() {
        assert_eq!("docker".parse::<RuntimeKind>().unwrap(), RuntimeKind::Docker);
        assert_eq!(" Podman ".parse::<RuntimeKind>().unwrap(), RuntimeKind::Podman);
        let err = "containerd".parse::<RuntimeKind>().unwrap_err();
        assert!(err.to_string().contains("containerd"));
    }

    #[test]
    fn test_new_container_requires_image() {
        let mut cfg = BootstrapConfig::default();
        cfg.container.volume = "/a:/b".to_string();
        let err = new_container(&cfg.build_config(false)).err().expect("image is required");
        assert!(err.is_config_error());

        cfg.container.image = "isogen:latest".to_string();
        let handle = new_container(&cfg.build_config(false)).expect("handle");
        assert!(handle.id().is_none());
    }

    #[test]
    fn test_new_container_unsupported_runtime() {
        let mut cfg = BootstrapConfig::default();
        cfg.container.image = "isogen:latest".to_string();
        cfg.container.runtime = "lxc".to_string();
        assert!(new_container(&cfg.build_config(false)).is_err());
    }
}
