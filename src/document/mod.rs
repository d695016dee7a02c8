//! Rendered cloud-init documents.
//!
//! The orchestrator does not render documents itself; it asks a [`CloudInitSource`] for the
//! finished user-data and network-config content and hands it to the builder.

use crate::error::{IsogenError, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// File holding rendered user-data inside a documents directory
pub const USER_DATA_DOCUMENT: &str = "user-data";

/// File holding rendered network-config inside a documents directory
pub const NETWORK_CONFIG_DOCUMENT: &str = "network-config";

/// Rendered cloud-init content for one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudInitData {
    /// user-data document
    pub user_data: Bytes,
    /// network-config document
    pub network_config: Bytes,
}

/// Anything that can yield rendered cloud-init content
pub trait CloudInitSource: Send + Sync {
    /// Produce the rendered documents
    fn cloud_init(&self) -> Result<CloudInitData>;
}

impl CloudInitSource for CloudInitData {
    fn cloud_init(&self) -> Result<CloudInitData> {
        Ok(self.clone())
    }
}

/// Documents pre-rendered into a directory as `user-data` and `network-config`
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    /// Bundle rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the documents are read from
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> Result<Bytes> {
        let path = self.root.join(name);
        let content = std::fs::read(&path).map_err(|e| IsogenError::Document {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;

        if content.is_empty() {
            return Err(IsogenError::Document {
                reason: format!("{} is empty", path.display()),
            });
        }

        Ok(Bytes::from(content))
    }
}

impl CloudInitSource for DirectoryBundle {
    fn cloud_init(&self) -> Result<CloudInitData> {
        Ok(CloudInitData {
            user_data: self.read(USER_DATA_DOCUMENT)?,
            network_config: self.read(NETWORK_CONFIG_DOCUMENT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_bundle_reads_documents() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(USER_DATA_DOCUMENT), "#cloud-config\n").unwrap();
        std::fs::write(dir.path().join(NETWORK_CONFIG_DOCUMENT), "version: 2\n").unwrap();

        let data = DirectoryBundle::new(dir.path()).cloud_init().expect("documents readable");
        assert_eq!(data.user_data, Bytes::from_static(b"#cloud-config\n"));
        assert_eq!(data.network_config, Bytes::from_static(b"version: 2\n"));
    }

    #[test]
    fn test_directory_bundle_missing_network_config() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(USER_DATA_DOCUMENT), "#cloud-config\n").unwrap();

        let err = DirectoryBundle::new(dir.path()).cloud_init().unwrap_err();
        assert!(matches!(err, IsogenError::Document { .. }));
        assert!(err.to_string().contains(NETWORK_CONFIG_DOCUMENT));
    }

    #[test]
    fn test_directory_bundle_rejects_empty_document() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(USER_DATA_DOCUMENT), "").unwrap();
        std::fs::write(dir.path().join(NETWORK_CONFIG_DOCUMENT), "version: 2\n").unwrap();

        let err = DirectoryBundle::new(dir.path()).cloud_init().unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }
}
