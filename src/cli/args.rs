//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bootstrap ISO generator for ephemeral cluster nodes
#[derive(Parser, Debug)]
#[command(
    name = "isogen",
    version,
    about = "Build a bootstrap ISO for an ephemeral cluster node",
    long_about = "Builds a bootable ISO by running a containerized image builder against a
mounted output directory and rendered cloud-init documents.

Usage:
  isogen --config isogen.toml generate --documents ./cloud-init
  isogen --config isogen.toml --debug generate
  isogen validate

Exit code 0 = ISO built and builder metadata found in the output directory."
)]
pub struct Args {
    /// Bootstrap config file
    #[arg(
        short,
        long,
        global = true,
        env = "ISOGEN_CONFIG",
        default_value = "isogen.toml",
        value_name = "PATH"
    )]
    pub config: PathBuf,

    /// Keep the builder container after the build and show verbose output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress progress output (errors are still shown)
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the ISO
    Generate {
        /// Directory holding rendered `user-data` and `network-config`
        #[arg(short, long, default_value = "cloud-init", value_name = "DIR")]
        documents: PathBuf,

        /// Skip the container runtime availability check
        #[arg(long)]
        skip_preflight: bool,
    },

    /// Check the config file without starting a container
    Validate,
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Generate { .. } => "generate",
            Command::Validate => "validate",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Config path cannot be empty".to_string());
        }

        if let Command::Generate { documents, .. } = &self.command
            && documents.as_os_str().is_empty()
        {
            return Err("Documents directory cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.debug, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let args = Args::try_parse_from([
            "isogen",
            "--config",
            "/etc/isogen.toml",
            "--debug",
            "generate",
            "--documents",
            "/srv/docs",
        ])
        .expect("args parse");

        assert!(args.debug);
        assert_eq!(args.config, PathBuf::from("/etc/isogen.toml"));
        match args.command {
            Command::Generate {
                documents,
                skip_preflight,
            } => {
                assert_eq!(documents, PathBuf::from("/srv/docs"));
                assert!(!skip_preflight);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["isogen", "validate", "--config", "x.toml"])
            .expect("args parse");
        assert_eq!(args.command.name(), "validate");
        assert_eq!(args.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn test_debug_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["isogen", "--debug", "--quiet", "validate"]).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_documents() {
        let args = Args::try_parse_from(["isogen", "generate", "--documents", ""])
            .expect("args parse");
        assert!(args.validate().is_err());
    }
}
