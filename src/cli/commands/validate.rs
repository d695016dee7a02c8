//! Validate command implementation.
//!
//! Runs the same input checks as a build, without any container.

use crate::cli::{Args, RuntimeConfig};
use crate::config::BootstrapConfig;
use crate::container::RuntimeKind;
use crate::error::{IsogenError, Result};
use crate::isogen::validate;

/// Execute validate command
pub(super) async fn execute_validate(args: &Args, config: &RuntimeConfig) -> Result<()> {
    config.verbose_println(&format!("Validating {}...", args.config.display()));

    let bootstrap = BootstrapConfig::load(&args.config)?;
    let build = bootstrap.build_config(args.debug);

    let bind = validate(&build)?;
    let runtime: RuntimeKind = build.runtime_kind.parse()?;
    if build.container_image_ref.is_empty() {
        return Err(IsogenError::invalid_config("container image is not specified"));
    }

    config.println(&format!("📋 Config {} is valid", args.config.display()));
    config.indent(&format!("runtime:        {}", runtime));
    config.indent(&format!("image:          {}", build.container_image_ref));
    config.indent(&format!("host dir:       {}", bind.source.display()));
    config.indent(&format!("container dir:  {}", bind.destination.display()));
    config.indent(&format!("user-data:      {}", build.user_data_file_name));
    config.indent(&format!("network-config: {}", build.network_config_file_name));

    Ok(())
}
