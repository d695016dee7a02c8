//! Build input validation.

use super::volume::VolumeBind;
use crate::config::BuildConfig;
use crate::error::{IsogenError, Result};

/// Validates a build configuration.
///
/// Checks run in order and stop at the first defect:
/// 1. the volume bind parses
/// 2. the user-data file name is set
/// 3. the network-config file name is set
///
/// Returns the parsed volume bind so later stages never re-parse the string.
pub fn validate(cfg: &BuildConfig) -> Result<VolumeBind> {
    let bind = VolumeBind::parse(&cfg.volume_bind)?;

    if cfg.user_data_file_name.is_empty() {
        return Err(IsogenError::invalid_config(
            "builder user_data_file_name is not specified",
        ));
    }

    if cfg.network_config_file_name.is_empty() {
        return Err(IsogenError::invalid_config(
            "builder network_config_file_name is not specified",
        ));
    }

    Ok(bind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;

    fn config(volume: &str, user_data: &str, net_conf: &str) -> BuildConfig {
        let mut cfg = BootstrapConfig::default();
        cfg.container.volume = volume.to_string();
        cfg.builder.user_data_file_name = user_data.to_string();
        cfg.builder.network_config_file_name = net_conf.to_string();
        cfg.build_config(false)
    }

    #[test]
    fn test_valid_config() {
        let bind = validate(&config("/tmp/vol:/dst", "user-data", "net-conf")).expect("valid");
        assert_eq!(bind.to_string(), "/tmp/vol:/dst");
    }

    #[test]
    fn test_bad_volume_wins_over_file_names() {
        for (user_data, net_conf) in [("user-data", "net-conf"), ("", ""), ("user-data", "")] {
            let err = validate(&config("/tmp/vol:/dst:/dst1", user_data, net_conf)).unwrap_err();
            assert!(err.to_string().contains("volume"), "{err}");
        }
    }

    #[test]
    fn test_missing_volume() {
        let err = validate(&config("", "user-data", "net-conf")).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_user_data_name() {
        let err = validate(&config("/tmp/vol:/dst", "", "net-conf")).unwrap_err();
        assert!(err.to_string().contains("user_data_file_name"));
    }

    #[test]
    fn test_missing_network_config_name() {
        let err = validate(&config("/tmp/vol:/dst", "user-data", "")).unwrap_err();
        assert!(err.to_string().contains("network_config_file_name"));
    }

    #[test]
    fn test_user_data_checked_before_network_config() {
        let err = validate(&config("/tmp/vol:/dst", "", "")).unwrap_err();
        assert!(err.to_string().contains("user_data_file_name"));
    }
}
