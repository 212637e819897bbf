use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::table::TableRef;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub warehouse: WarehouseConfig,
    pub toolbox: ToolboxConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WarehouseConfig {
    pub project: String,
    pub location: String,
    pub dataset: String,
    pub table: String,
}

impl WarehouseConfig {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.project, &self.dataset, &self.table)
    }
}

/// Remote toolset served by an MCP Toolbox instance.
#[derive(Clone, Debug)]
pub struct ToolboxConfig {
    pub enabled: bool,
    pub url: String,
    pub toolset: String,
    pub required_tools: Vec<String>,
    pub api_token: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub warehouse_project: Option<String>,
    pub warehouse_dataset: Option<String>,
    pub warehouse_table: Option<String>,
    pub toolbox_enabled: Option<bool>,
    pub toolbox_url: Option<String>,
    pub toolbox_toolset: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

pub const DEFAULT_REQUIRED_TOOLS: &[&str] = &["execute_sql_tool"];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://travel.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            warehouse: WarehouseConfig {
                project: "fon-test-project".to_string(),
                location: "europe-southwest1".to_string(),
                dataset: "foncorp_travel_data".to_string(),
                table: "travel_requests".to_string(),
            },
            toolbox: ToolboxConfig {
                enabled: false,
                url: "http://127.0.0.1:5000".to_string(),
                toolset: "adk-travel-agent-toolset".to_string(),
                required_tools: DEFAULT_REQUIRED_TOOLS
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
                api_token: None,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("travel.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(warehouse) = patch.warehouse {
            if let Some(project) = warehouse.project {
                self.warehouse.project = project;
            }
            if let Some(location) = warehouse.location {
                self.warehouse.location = location;
            }
            if let Some(dataset) = warehouse.dataset {
                self.warehouse.dataset = dataset;
            }
            if let Some(table) = warehouse.table {
                self.warehouse.table = table;
            }
        }

        if let Some(toolbox) = patch.toolbox {
            if let Some(enabled) = toolbox.enabled {
                self.toolbox.enabled = enabled;
            }
            if let Some(url) = toolbox.url {
                self.toolbox.url = url;
            }
            if let Some(toolset) = toolbox.toolset {
                self.toolbox.toolset = toolset;
            }
            if let Some(required_tools) = toolbox.required_tools {
                self.toolbox.required_tools = required_tools;
            }
            if let Some(api_token_value) = toolbox.api_token {
                self.toolbox.api_token = Some(secret_value(api_token_value));
            }
            if let Some(timeout_secs) = toolbox.timeout_secs {
                self.toolbox.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TRAVEL_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("TRAVEL_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("TRAVEL_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("TRAVEL_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("TRAVEL_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("TRAVEL_WAREHOUSE_PROJECT") {
            self.warehouse.project = value;
        }
        if let Some(value) = read_env("TRAVEL_WAREHOUSE_LOCATION") {
            self.warehouse.location = value;
        }
        if let Some(value) = read_env("TRAVEL_WAREHOUSE_DATASET") {
            self.warehouse.dataset = value;
        }
        if let Some(value) = read_env("TRAVEL_WAREHOUSE_TABLE") {
            self.warehouse.table = value;
        }

        if let Some(value) = read_env("TRAVEL_TOOLBOX_ENABLED") {
            self.toolbox.enabled = parse_bool("TRAVEL_TOOLBOX_ENABLED", &value)?;
        }
        if let Some(value) = read_env("TRAVEL_TOOLBOX_URL") {
            self.toolbox.url = value;
        }
        if let Some(value) = read_env("TRAVEL_TOOLBOX_TOOLSET") {
            self.toolbox.toolset = value;
        }
        if let Some(value) = read_env("TRAVEL_TOOLBOX_REQUIRED_TOOLS") {
            self.toolbox.required_tools = parse_list(&value);
        }
        if let Some(value) = read_env("TRAVEL_TOOLBOX_API_TOKEN") {
            self.toolbox.api_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("TRAVEL_TOOLBOX_TIMEOUT_SECS") {
            self.toolbox.timeout_secs = parse_u64("TRAVEL_TOOLBOX_TIMEOUT_SECS", &value)?;
        }

        let log_level = read_env("TRAVEL_LOGGING_LEVEL").or_else(|| read_env("TRAVEL_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("TRAVEL_LOGGING_FORMAT").or_else(|| read_env("TRAVEL_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(project) = overrides.warehouse_project {
            self.warehouse.project = project;
        }
        if let Some(dataset) = overrides.warehouse_dataset {
            self.warehouse.dataset = dataset;
        }
        if let Some(table) = overrides.warehouse_table {
            self.warehouse.table = table;
        }
        if let Some(enabled) = overrides.toolbox_enabled {
            self.toolbox.enabled = enabled;
        }
        if let Some(url) = overrides.toolbox_url {
            self.toolbox.url = url;
        }
        if let Some(toolset) = overrides.toolbox_toolset {
            self.toolbox.toolset = toolset;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_warehouse(&self.warehouse)?;
        validate_toolbox(&self.toolbox)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("travel.toml"), PathBuf::from("config/travel.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_warehouse(warehouse: &WarehouseConfig) -> Result<(), ConfigError> {
    validate_identifier("warehouse.project", &warehouse.project, &['-', '_'])?;
    validate_identifier("warehouse.dataset", &warehouse.dataset, &['_'])?;
    validate_identifier("warehouse.table", &warehouse.table, &['_'])?;

    if warehouse.location.trim().is_empty() {
        return Err(ConfigError::Validation("warehouse.location must not be empty".to_string()));
    }

    Ok(())
}

/// Identifiers are interpolated into SQL text, so anything beyond ASCII
/// alphanumerics and the listed separators is refused.
fn validate_identifier(key: &str, value: &str, separators: &[char]) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }

    if let Some(bad) =
        value.chars().find(|ch| !ch.is_ascii_alphanumeric() && !separators.contains(ch))
    {
        return Err(ConfigError::Validation(format!(
            "{key} contains unsupported character `{bad}` (allowed: ASCII letters, digits, {})",
            separators.iter().map(|ch| format!("`{ch}`")).collect::<Vec<_>>().join(" ")
        )));
    }

    Ok(())
}

fn validate_toolbox(toolbox: &ToolboxConfig) -> Result<(), ConfigError> {
    if toolbox.timeout_secs == 0 || toolbox.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "toolbox.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !toolbox.enabled {
        return Ok(());
    }

    if !toolbox.url.starts_with("http://") && !toolbox.url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "toolbox.url must start with http:// or https:// when toolbox.enabled is true"
                .to_string(),
        ));
    }

    if toolbox.toolset.trim().is_empty() {
        return Err(ConfigError::Validation(
            "toolbox.toolset is required when toolbox.enabled is true".to_string(),
        ));
    }

    let blank_token =
        toolbox.api_token.as_ref().map(|token| token.expose_secret().trim().is_empty());
    if blank_token == Some(true) {
        return Err(ConfigError::Validation(
            "toolbox.api_token is set but empty; remove it or provide a token".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    warehouse: Option<WarehousePatch>,
    toolbox: Option<ToolboxPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WarehousePatch {
    project: Option<String>,
    location: Option<String>,
    dataset: Option<String>,
    table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ToolboxPatch {
    enabled: Option<bool>,
    url: Option<String>,
    toolset: Option<String>,
    required_tools: Option<Vec<String>>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_point_at_the_travel_requests_table() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(
            config.warehouse.table_ref().qualified()
                == "fon-test-project.foncorp_travel_data.travel_requests",
            "default table should be the travel requests table",
        )?;
        ensure(!config.toolbox.enabled, "toolbox should be disabled by default")?;
        ensure(
            config.toolbox.required_tools == vec!["execute_sql_tool".to_string()],
            "sql tool should be required by default",
        )?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_TOOLBOX_TOKEN", "token-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("travel.toml");
            fs::write(
                &path,
                r#"
[warehouse]
project = "acme-travel"

[toolbox]
enabled = true
url = "https://toolbox.example.com"
api_token = "${TEST_TOOLBOX_TOKEN}"
required_tools = ["execute_sql_tool", "list_tables"]
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.warehouse.project == "acme-travel", "project should come from file")?;
            ensure(
                config.toolbox.api_token.as_ref().map(|token| token.expose_secret())
                    == Some("token-from-env"),
                "toolbox token should be interpolated from environment",
            )?;
            ensure(config.toolbox.required_tools.len() == 2, "required tools should be loaded")?;
            Ok(())
        })();

        clear_vars(&["TEST_TOOLBOX_TOKEN"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRAVEL_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("TRAVEL_WAREHOUSE_TABLE", "requests_from_env");
        env::set_var("TRAVEL_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("travel.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[warehouse]
dataset = "dataset_from_file"
table = "requests_from_file"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "env log format alias should apply",
            )?;
            ensure(config.warehouse.dataset == "dataset_from_file", "file dataset should apply")?;
            ensure(
                config.warehouse.table == "requests_from_env",
                "env table should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&["TRAVEL_DATABASE_URL", "TRAVEL_WAREHOUSE_TABLE", "TRAVEL_LOG_FORMAT"]);
        result
    }

    #[test]
    fn table_identifiers_reject_sql_metacharacters() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                warehouse_table: Some("travel`; DROP TABLE x; --".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };

        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("warehouse.table")),
            "validation failure should mention warehouse.table",
        )
    }

    #[test]
    fn enabled_toolbox_requires_http_url() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                toolbox_enabled: Some(true),
                toolbox_url: Some("toolbox.internal:5000".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };

        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("toolbox.url")),
            "validation failure should mention toolbox.url",
        )
    }

    #[test]
    fn invalid_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRAVEL_TOOLBOX_ENABLED", "sometimes");
        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected env override failure".to_string()),
            Err(error) => ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "TRAVEL_TOOLBOX_ENABLED"),
                "error should name the offending variable",
            ),
        };

        clear_vars(&["TRAVEL_TOOLBOX_ENABLED"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRAVEL_TOOLBOX_API_TOKEN", "toolbox-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("toolbox-secret-value"),
                "debug output should not contain the toolbox token",
            )
        })();

        clear_vars(&["TRAVEL_TOOLBOX_API_TOKEN"]);
        result
    }
}
