//! Bootstrap configuration loaded from a TOML file.
//!
//! The file mirrors the two sections the ISO builder cares about:
//!
//! ```toml
//! [container]
//! volume = "/srv/iso:/config"
//! image = "quay.io/airshipit/isogen:latest"
//! runtime = "docker"
//!
//! [builder]
//! user_data_file_name = "user-data"
//! network_config_file_name = "network-config"
//! ```
//!
//! Fields stay strings here; [`crate::isogen::validate`] parses them into typed values.

use crate::error::{IsogenError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default container run timeout (60 minutes)
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 3600;

/// Default name of the metadata file the builder writes next to the ISO
pub const DEFAULT_OUTPUT_METADATA_FILE_NAME: &str = "output-metadata.yaml";

/// Top-level bootstrap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Builder container settings
    pub container: ContainerConfig,
    /// Settings handed to the image builder tool
    pub builder: BuilderConfig,
}

/// `[container]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerConfig {
    /// Volume bind, `hostPath:containerPath`
    pub volume: String,
    /// Builder image reference
    pub image: String,
    /// Container runtime name (`docker` or `podman`)
    pub runtime: String,
    /// Run the builder container privileged
    pub privileged: bool,
    /// Upper bound for the build command, enforced by the runtime adapter
    pub run_timeout_secs: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            volume: String::new(),
            image: String::new(),
            runtime: "docker".to_string(),
            privileged: false,
            run_timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
        }
    }
}

/// `[builder]` section.
///
/// Serialized as-is into the builder config file the tool reads inside the container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
    /// File name for the rendered user-data document
    #[serde(alias = "user_data_file_name")]
    pub user_data_file_name: String,
    /// File name for the rendered network-config document
    #[serde(alias = "network_config_file_name")]
    pub network_config_file_name: String,
    /// File the builder writes once the ISO is produced
    #[serde(alias = "output_metadata_file_name")]
    pub output_metadata_file_name: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            user_data_file_name: String::new(),
            network_config_file_name: String::new(),
            output_metadata_file_name: DEFAULT_OUTPUT_METADATA_FILE_NAME.to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            IsogenError::invalid_config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&contents).map_err(|e| match e {
            IsogenError::InvalidConfig { reason } => IsogenError::invalid_config(format!(
                "{} ({})",
                reason,
                path.display()
            )),
            other => other,
        })
    }

    /// Parse config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| IsogenError::invalid_config(format!("Failed to parse config: {}", e)))?;

        if config.container.run_timeout_secs == 0 {
            return Err(IsogenError::invalid_config(
                "container run_timeout_secs must be greater than zero",
            ));
        }

        Ok(config)
    }

    /// Flatten into the per-invocation build configuration
    pub fn build_config(&self, debug: bool) -> BuildConfig {
        BuildConfig {
            volume_bind: self.container.volume.clone(),
            container_image_ref: self.container.image.clone(),
            runtime_kind: self.container.runtime.clone(),
            user_data_file_name: self.builder.user_data_file_name.clone(),
            network_config_file_name: self.builder.network_config_file_name.clone(),
            output_metadata_file_name: self.builder.output_metadata_file_name.clone(),
            privileged: self.container.privileged,
            run_timeout: Duration::from_secs(self.container.run_timeout_secs),
            debug,
        }
    }
}

/// Everything one ISO build needs, borrowed read-only by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Volume bind string, `hostPath:containerPath`
    pub volume_bind: String,
    /// Builder image reference
    pub container_image_ref: String,
    /// Runtime name, handed to the container factory
    pub runtime_kind: String,
    /// File name for the rendered user-data document
    pub user_data_file_name: String,
    /// File name for the rendered network-config document
    pub network_config_file_name: String,
    /// File the builder writes once the ISO is produced
    pub output_metadata_file_name: String,
    /// Run the builder container privileged
    pub privileged: bool,
    /// Upper bound for the build command
    pub run_timeout: Duration,
    /// Keep the builder container after the build
    pub debug: bool,
}

impl BuildConfig {
    /// The `[builder]` section as the builder tool expects it
    pub fn builder_section(&self) -> BuilderConfig {
        BuilderConfig {
            user_data_file_name: self.user_data_file_name.clone(),
            network_config_file_name: self.network_config_file_name.clone(),
            output_metadata_file_name: self.output_metadata_file_name.clone(),
        }
    }
}
