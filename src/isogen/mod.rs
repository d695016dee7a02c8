//! Bootstrap ISO generation.
//!
//! - `volume` - Volume bind parsing
//! - `validate` - Build input validation
//! - `staging` - Cloud-init staging and artifact checks
//! - `orchestrator` - Build container lifecycle

mod orchestrator;
mod staging;
mod validate;
mod volume;

pub use orchestrator::{BuildOutcome, generate_bootstrap_iso};
pub use staging::{
    BUILDER_CONFIG_ENV, BUILDER_CONFIG_FILE_NAME, builder_config_env, stage_cloud_init,
    verify_artifacts,
};
pub use validate::validate;
pub use volume::{VOLUME_SEPARATOR, VolumeBind};
