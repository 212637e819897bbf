use serde_json::Value;
use travel_mcp::{bootstrap_with_config, BootstrapError};

use crate::commands::{
    async_runtime, load_config, CommandResult, Failure, EXIT_CONFIG, EXIT_DB_CONNECT,
    EXIT_INVALID_ARGS, EXIT_MIGRATION, EXIT_RUNTIME, EXIT_TOOLSET, EXIT_TOOL_FAILED,
    EXIT_UNKNOWN_TOOL,
};

/// Calls one tool the way the agent host would and reports its raw output.
pub fn run(name: &str, raw_args: &str) -> CommandResult {
    let command = "tool";

    let args: Value = match serde_json::from_str(raw_args) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            return CommandResult::failure(
                command,
                "invalid_arguments",
                "--args must be a JSON object",
                EXIT_INVALID_ARGS,
            );
        }
        Err(error) => {
            return CommandResult::failure(
                command,
                "invalid_arguments",
                format!("--args is not valid JSON: {error}"),
                EXIT_INVALID_ARGS,
            );
        }
    };

    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match async_runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<String, Failure> = runtime.block_on(async {
        let app = bootstrap_with_config(config).await.map_err(bootstrap_failure)?;

        let outcome = if app.runtime.registry().contains(name) {
            app.runtime
                .call_tool_text(name, args)
                .await
                .map_err(|error| ("tool_execution", format!("{error:#}"), EXIT_TOOL_FAILED))
        } else {
            Err((
                "unknown_tool",
                format!(
                    "unknown tool `{name}`; available: {}",
                    app.runtime.registry().names().join(", ")
                ),
                EXIT_UNKNOWN_TOOL,
            ))
        };

        app.db_pool.close().await;
        outcome
    });

    match result {
        Ok(output) => CommandResult::success(command, output),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(command, error_class, message, exit_code)
        }
    }
}

fn bootstrap_failure(error: BootstrapError) -> Failure {
    let message = error.to_string();
    match error {
        BootstrapError::Config(_) => ("config_validation", message, EXIT_CONFIG),
        BootstrapError::DatabaseConnect(_) => ("db_connectivity", message, EXIT_DB_CONNECT),
        BootstrapError::Migration(_) => ("migration", message, EXIT_MIGRATION),
        BootstrapError::Toolset(_) => ("toolset", message, EXIT_TOOLSET),
        BootstrapError::Instruction(_) => ("runtime_init", message, EXIT_RUNTIME),
    }
}
