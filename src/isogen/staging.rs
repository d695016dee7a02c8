//! Cloud-init staging and artifact checks on the host side of the volume bind.

use super::volume::VolumeBind;
use crate::config::BuildConfig;
use crate::document::CloudInitData;
use crate::error::{IsogenError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builder config file written next to the cloud-init documents
pub const BUILDER_CONFIG_FILE_NAME: &str = "builder-conf.yaml";

/// Environment variable telling the builder where its config lives
pub const BUILDER_CONFIG_ENV: &str = "BUILDER_CONFIG";

/// Writes the documents and builder config into the bind source directory.
///
/// Returns the host paths written, in write order.
pub fn stage_cloud_init(
    bind: &VolumeBind,
    cfg: &BuildConfig,
    data: &CloudInitData,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&bind.source)?;

    let builder_config = serde_yaml::to_string(&cfg.builder_section())
        .map_err(std::io::Error::other)?;

    let files: [(&str, &[u8]); 3] = [
        (cfg.user_data_file_name.as_str(), &data.user_data[..]),
        (cfg.network_config_file_name.as_str(), &data.network_config[..]),
        (BUILDER_CONFIG_FILE_NAME, builder_config.as_bytes()),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = bind.source.join(name);
        write_private(&path, content)?;
        log::debug!("Staged {} ({} bytes)", path.display(), content.len());
        written.push(path);
    }

    Ok(written)
}

/// `BUILDER_CONFIG=<destination>/builder-conf.yaml`, as seen from inside the container
pub fn builder_config_env(bind: &VolumeBind) -> String {
    format!(
        "{}={}",
        BUILDER_CONFIG_ENV,
        bind.destination.join(BUILDER_CONFIG_FILE_NAME).display()
    )
}

/// Confirms the builder left its output metadata in the bind source directory
pub fn verify_artifacts(bind: &VolumeBind, cfg: &BuildConfig) -> Result<PathBuf> {
    let metadata_path = bind.source.join(&cfg.output_metadata_file_name);
    if !metadata_path.is_file() {
        return Err(IsogenError::MissingArtifact {
            path: metadata_path,
        });
    }
    Ok(metadata_path)
}

fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use bytes::Bytes;
    use tempfile::TempDir;

    fn build_config(volume: &str) -> BuildConfig {
        let mut cfg = BootstrapConfig::default();
        cfg.container.volume = volume.to_string();
        cfg.builder.user_data_file_name = "user-data".to_string();
        cfg.builder.network_config_file_name = "net-conf".to_string();
        cfg.build_config(false)
    }

    #[test]
    fn test_stage_writes_documents_and_builder_config() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let volume = format!("{}:/dst", dir.path().display());
        let cfg = build_config(&volume);
        let bind = VolumeBind::parse(&volume).unwrap();
        let data = CloudInitData {
            user_data: Bytes::from_static(b"#cloud-config\n"),
            network_config: Bytes::from_static(b"version: 2\n"),
        };

        let written = stage_cloud_init(&bind, &cfg, &data).expect("staging");
        assert_eq!(written.len(), 3);

        let user_data = std::fs::read_to_string(dir.path().join("user-data")).unwrap();
        assert_eq!(user_data, "#cloud-config\n");
        let net_conf = std::fs::read_to_string(dir.path().join("net-conf")).unwrap();
        assert_eq!(net_conf, "version: 2\n");
        let builder = std::fs::read_to_string(dir.path().join(BUILDER_CONFIG_FILE_NAME)).unwrap();
        assert!(builder.contains("userDataFileName: user-data"));
        assert!(builder.contains("networkConfigFileName: net-conf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_staged_files_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let volume = format!("{}:/dst", dir.path().display());
        let bind = VolumeBind::parse(&volume).unwrap();
        stage_cloud_init(&bind, &build_config(&volume), &CloudInitData::default())
            .expect("staging");

        let mode = std::fs::metadata(dir.path().join("user-data"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_builder_config_env_uses_container_path() {
        let bind = VolumeBind::parse("/tmp/iso:/dst").unwrap();
        assert_eq!(
            builder_config_env(&bind),
            "BUILDER_CONFIG=/dst/builder-conf.yaml"
        );
    }

    #[test]
    fn test_verify_artifacts() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let volume = format!("{}:/dst", dir.path().display());
        let cfg = build_config(&volume);
        let bind = VolumeBind::parse(&volume).unwrap();

        let err = verify_artifacts(&bind, &cfg).unwrap_err();
        assert!(matches!(err, IsogenError::MissingArtifact { .. }));

        std::fs::write(dir.path().join(&cfg.output_metadata_file_name), "isoPath: x.iso\n")
            .unwrap();
        let path = verify_artifacts(&bind, &cfg).expect("metadata present");
        assert!(path.ends_with(&cfg.output_metadata_file_name));
    }
}
