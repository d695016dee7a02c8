//! Volume bind parsing.

use crate::error::{IsogenError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Separator between host and container paths
pub const VOLUME_SEPARATOR: char = ':';

/// Host-to-container mount, parsed from `source:destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeBind {
    /// Host directory
    pub source: PathBuf,
    /// Mount point inside the container
    pub destination: PathBuf,
}

impl VolumeBind {
    /// Parses a `source:destination` bind.
    ///
    /// Exactly two non-empty segments are accepted. A trailing mode such as `:ro` makes
    /// three segments and is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let segments: Vec<&str> = value.split(VOLUME_SEPARATOR).collect();

        match segments.as_slice() {
            [source, destination] if !source.is_empty() && !destination.is_empty() => Ok(Self {
                source: PathBuf::from(source),
                destination: PathBuf::from(destination),
            }),
            [_, _] => Err(IsogenError::invalid_config(format!(
                "container volume '{}' has an empty path; use hostPath:containerPath",
                value
            ))),
            _ => Err(IsogenError::invalid_config(format!(
                "container volume '{}' must have exactly two segments (hostPath:containerPath), found {}",
                value,
                segments.len()
            ))),
        }
    }
}

impl FromStr for VolumeBind {
    type Err = IsogenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VolumeBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.source.display(),
            VOLUME_SEPARATOR,
            self.destination.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_segments() {
        let bind = VolumeBind::parse("/tmp/iso:/dst").expect("valid bind");
        assert_eq!(bind.source, PathBuf::from("/tmp/iso"));
        assert_eq!(bind.destination, PathBuf::from("/dst"));
        assert_eq!(bind.to_string(), "/tmp/iso:/dst");
    }

    #[test]
    fn test_parse_relative_segments() {
        let bind: VolumeBind = "a:b".parse().expect("valid bind");
        assert_eq!(bind.source, PathBuf::from("a"));
        assert_eq!(bind.destination, PathBuf::from("b"));
    }

    #[test]
    fn test_parse_rejects_bad_segment_counts() {
        for value in ["", "a", "/host/dir", "a:b:c", "/host/dir:/dst:/extra", "/h:/d:ro"] {
            let err = VolumeBind::parse(value).unwrap_err();
            assert!(err.is_config_error(), "{value:?} should be a config error");
        }
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for value in [":b", "a:", ":"] {
            let err = VolumeBind::parse(value).unwrap_err();
            assert!(err.to_string().contains("empty path"), "{value:?}: {err}");
        }
    }
}
