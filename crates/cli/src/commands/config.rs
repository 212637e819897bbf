use std::env;
use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use toml::Value;
use travel_core::config::{resolve_config_path, AppConfig, LoadOptions};

struct ConfigField {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl ConfigField {
    fn new(
        key_path: &'static str,
        value: impl Into<String>,
        env_keys: &'static [&'static str],
    ) -> Self {
        Self { key_path, value: value.into(), env_keys }
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    let api_token = config
        .toolbox
        .api_token
        .as_ref()
        .map(|token| redact_token(token.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        ConfigField::new("database.url", &config.database.url, &["TRAVEL_DATABASE_URL"]),
        ConfigField::new(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["TRAVEL_DATABASE_MAX_CONNECTIONS"],
        ),
        ConfigField::new(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["TRAVEL_DATABASE_TIMEOUT_SECS"],
        ),
        ConfigField::new(
            "warehouse.project",
            &config.warehouse.project,
            &["TRAVEL_WAREHOUSE_PROJECT"],
        ),
        ConfigField::new(
            "warehouse.location",
            &config.warehouse.location,
            &["TRAVEL_WAREHOUSE_LOCATION"],
        ),
        ConfigField::new(
            "warehouse.dataset",
            &config.warehouse.dataset,
            &["TRAVEL_WAREHOUSE_DATASET"],
        ),
        ConfigField::new("warehouse.table", &config.warehouse.table, &["TRAVEL_WAREHOUSE_TABLE"]),
        ConfigField::new(
            "toolbox.enabled",
            config.toolbox.enabled.to_string(),
            &["TRAVEL_TOOLBOX_ENABLED"],
        ),
        ConfigField::new("toolbox.url", &config.toolbox.url, &["TRAVEL_TOOLBOX_URL"]),
        ConfigField::new("toolbox.toolset", &config.toolbox.toolset, &["TRAVEL_TOOLBOX_TOOLSET"]),
        ConfigField::new(
            "toolbox.required_tools",
            config.toolbox.required_tools.join(","),
            &["TRAVEL_TOOLBOX_REQUIRED_TOOLS"],
        ),
        ConfigField::new("toolbox.api_token", api_token, &["TRAVEL_TOOLBOX_API_TOKEN"]),
        ConfigField::new(
            "toolbox.timeout_secs",
            config.toolbox.timeout_secs.to_string(),
            &["TRAVEL_TOOLBOX_TIMEOUT_SECS"],
        ),
        ConfigField::new(
            "logging.level",
            &config.logging.level,
            &["TRAVEL_LOGGING_LEVEL", "TRAVEL_LOG_LEVEL"],
        ),
        ConfigField::new(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["TRAVEL_LOGGING_FORMAT", "TRAVEL_LOG_FORMAT"],
        ),
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
