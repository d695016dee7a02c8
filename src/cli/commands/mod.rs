//! Command execution.

mod generate;
mod validate;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use generate::execute_generate;
use validate::execute_validate;

/// Execute the command selected by the parsed arguments.
///
/// Command failures are reported here and turned into exit code 1.
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Generate { .. } => execute_generate(&args, &config).await,
        Command::Validate => execute_validate(&args, &config).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if config.is_verbose() && !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}
