//! ISO build orchestration.
//!
//! Drives one build container through pull, run, and then either removal or retention.
//! Each step's failure ends the build; runtime errors come back exactly as the
//! container handle produced them.

use super::staging::{builder_config_env, stage_cloud_init};
use super::validate::validate;
use crate::cli::OutputManager;
use crate::config::BuildConfig;
use crate::container::{ContainerHandle, RunRequest};
use crate::document::CloudInitSource;
use crate::error::Result;

/// Successful result of one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Identifier of the build container, if the runtime assigned one
    pub container_id: Option<String>,
    /// Container was left in place for inspection
    pub retained: bool,
}

/// Builds the bootstrap ISO.
///
/// Validation failures return before anything is logged or any container is touched. A
/// failed build is returned without attempting cleanup. With `cfg.debug` set, the finished
/// container is kept; otherwise it is removed and a removal failure fails the build.
///
/// # Arguments
///
/// * `bundle` - Source of the rendered cloud-init documents
/// * `builder` - Build container, owned by this run
/// * `cfg` - Build configuration
/// * `output` - Progress sink
pub async fn generate_bootstrap_iso(
    bundle: &dyn CloudInitSource,
    builder: &mut dyn ContainerHandle,
    cfg: &BuildConfig,
    output: &OutputManager,
) -> Result<BuildOutcome> {
    let bind = validate(cfg)?;

    output.info("Creating cloud-init for ephemeral cluster node");
    let cloud_init = bundle.cloud_init()?;
    for path in stage_cloud_init(&bind, cfg, &cloud_init)? {
        output.verbose(&format!("Wrote {}", path.display()));
    }

    output.verbose(&format!("Pulling builder image {}", cfg.container_image_ref));
    builder.pull_image().await?;

    output.progress(&format!(
        "Running default container command. Mounted dir: [{}]",
        bind
    ));
    builder
        .run_command(RunRequest {
            args: Vec::new(),
            stdin: Some(cloud_init.user_data.clone()),
            env: vec![builder_config_env(&bind)],
            mounts: vec![bind.clone()],
            privileged: cfg.privileged,
        })
        .await?;

    output.success("ISO successfully built.");

    let container_id = builder.id().map(String::from);

    if cfg.debug {
        output.warn(&format!(
            "Debug flag is set. Container {} stopped but not deleted.",
            container_id.as_deref().unwrap_or("<unknown>")
        ));
        return Ok(BuildOutcome {
            container_id,
            retained: true,
        });
    }

    output.progress("Removing container.");
    builder.remove_container().await?;

    Ok(BuildOutcome {
        container_id,
        retained: false,
    })
}
