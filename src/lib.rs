//! # Bootstrap ISO generator
//!
//! Builds a bootable ISO for an ephemeral cluster node by running a containerized image
//! builder against a mounted output directory and rendered cloud-init documents.
//!
//! ## Flow
//!
//! 1. Validate the volume bind and builder file names
//! 2. Stage cloud-init documents into the host side of the volume bind
//! 3. Pull the builder image and run its default command
//! 4. Remove the build container, or keep it when debugging
//!
//! ## Usage
//!
//! ```bash
//! isogen --config isogen.toml generate --documents ./cloud-init
//! isogen --config isogen.toml --debug generate   # keep the container
//! isogen validate
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod container;
pub mod document;
pub mod error;
pub mod isogen;

// Re-export main types for public API
pub use cli::{Args, OutputManager};
pub use config::{BootstrapConfig, BuildConfig};
pub use container::{ContainerHandle, DockerContainer, RunRequest, RuntimeKind};
pub use document::{CloudInitData, CloudInitSource, DirectoryBundle};
pub use error::{IsogenError, Result, RuntimeError};
pub use isogen::{BuildOutcome, VolumeBind, generate_bootstrap_iso, validate};
