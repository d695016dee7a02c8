//! Generate command implementation.
//!
//! Loads the bootstrap config, checks the container runtime, builds the ISO and confirms the
//! builder left its output metadata behind.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::config::BootstrapConfig;
use crate::container::{RuntimeKind, check_runtime_available, new_container};
use crate::document::DirectoryBundle;
use crate::error::Result;
use crate::isogen::{generate_bootstrap_iso, validate, verify_artifacts};

/// Execute generate command
pub(super) async fn execute_generate(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Generate {
        documents,
        skip_preflight,
    } = &args.command
    else {
        unreachable!("execute_generate called with non-Generate command");
    };

    config.verbose_println(&format!("Loading config from {}", args.config.display()));
    let bootstrap = BootstrapConfig::load(&args.config)?;
    let build = bootstrap.build_config(args.debug);

    // Fail on config defects before touching the runtime
    let bind = validate(&build)?;
    let runtime: RuntimeKind = build.runtime_kind.parse()?;

    if *skip_preflight {
        log::debug!("Skipping {} availability check", runtime);
    } else {
        config.verbose_println(&format!("Checking {} availability...", runtime));
        check_runtime_available(runtime).await?;
    }

    let mut builder = new_container(&build)?;
    let bundle = DirectoryBundle::new(documents);

    let outcome =
        generate_bootstrap_iso(&bundle, builder.as_mut(), &build, config.output()).await?;
    log::info!(
        "Build finished (container: {}, retained: {})",
        outcome.container_id.as_deref().unwrap_or("none"),
        outcome.retained
    );

    config.output().info("Checking artifacts");
    let metadata = verify_artifacts(&bind, &build)?;
    config.success_println(&format!("Build metadata written to {}", metadata.display()));

    Ok(())
}
