//! Tools served by a remote MCP Toolbox, resolved once at startup.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use travel_core::config::ToolboxConfig;

use crate::tools::Tool;

#[derive(Debug, Error)]
pub enum ToolsetError {
    #[error("could not build toolbox client: {0}")]
    Client(String),
    #[error("toolbox request to `{url}` failed: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("toolbox returned HTTP {status} for `{url}`")]
    Status { url: String, status: u16 },
    #[error("toolbox manifest for `{toolset}` could not be decoded: {reason}")]
    Manifest { toolset: String, reason: String },
    #[error("toolset `{toolset}` is missing required tools: {}", .missing.join(", "))]
    MissingTools { toolset: String, missing: Vec<String> },
}

#[derive(Clone, Debug, Deserialize)]
pub struct ToolsetManifest {
    #[serde(rename = "serverVersion", default)]
    pub server_version: String,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolManifest>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ToolManifest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterManifest>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

fn default_required() -> bool {
    true
}

impl ToolManifest {
    /// JSON schema for the tool's arguments object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for parameter in &self.parameters {
            let kind = match parameter.kind.as_str() {
                "float" => "number",
                "integer" | "boolean" | "array" | "object" | "number" => parameter.kind.as_str(),
                _ => "string",
            };
            properties.insert(
                parameter.name.clone(),
                json!({ "type": kind, "description": parameter.description }),
            );
            if parameter.required {
                required.push(Value::String(parameter.name.clone()));
            }
        }

        json!({ "type": "object", "properties": properties, "required": required })
    }
}

#[async_trait]
pub trait ToolsetLoader: Send + Sync {
    async fn load_toolset(&self, toolset: &str) -> Result<Vec<Arc<dyn Tool>>, ToolsetError>;
}

#[derive(Clone)]
struct ToolboxClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl ToolboxClient {
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

pub struct HttpToolsetLoader {
    client: ToolboxClient,
}

impl HttpToolsetLoader {
    pub fn new(config: &ToolboxConfig) -> Result<Self, ToolsetError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|error| ToolsetError::Client(error.to_string()))?;

        Ok(Self {
            client: ToolboxClient {
                http,
                base_url: config.url.trim_end_matches('/').to_string(),
                api_token: config.api_token.clone(),
            },
        })
    }
}

#[async_trait]
impl ToolsetLoader for HttpToolsetLoader {
    async fn load_toolset(&self, toolset: &str) -> Result<Vec<Arc<dyn Tool>>, ToolsetError> {
        let url = format!("{}/api/toolset/{toolset}", self.client.base_url);
        let response = self
            .client
            .request(self.client.http.get(&url))
            .send()
            .await
            .map_err(|source| ToolsetError::Http { url: url.clone(), source })?;

        if !response.status().is_success() {
            return Err(ToolsetError::Status { url, status: response.status().as_u16() });
        }

        let manifest: ToolsetManifest = response.json().await.map_err(|error| {
            ToolsetError::Manifest { toolset: toolset.to_string(), reason: error.to_string() }
        })?;

        tracing::info!(
            event_name = "toolset.loaded",
            toolset,
            server_version = %manifest.server_version,
            tools = manifest.tools.len(),
            "remote toolset loaded"
        );

        Ok(manifest
            .tools
            .into_iter()
            .map(|(name, manifest)| {
                Arc::new(RemoteTool { name, manifest, client: self.client.clone() })
                    as Arc<dyn Tool>
            })
            .collect())
    }
}

/// A tool whose implementation lives on the toolbox server.
pub struct RemoteTool {
    name: String,
    manifest: ToolManifest,
    client: ToolboxClient,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    result: Value,
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn parameters(&self) -> Value {
        self.manifest.input_schema()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let url = format!("{}/api/tool/{}/invoke", self.client.base_url, self.name);
        let response = self.client.request(self.client.http.post(&url).json(&input)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            bail!("toolbox tool `{}` failed with HTTP {status}: {body}", self.name);
        }

        let body: InvokeResponse = response.json().await?;
        Ok(body.result)
    }
}

/// Loads `toolset` and checks that every required tool came back.
pub async fn resolve_toolset(
    loader: &dyn ToolsetLoader,
    toolset: &str,
    required_tools: &[String],
) -> Result<Vec<Arc<dyn Tool>>, ToolsetError> {
    let tools = loader.load_toolset(toolset).await?;
    let missing: Vec<String> = required_tools
        .iter()
        .filter(|required| !tools.iter().any(|tool| tool.name() == required.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(ToolsetError::MissingTools { toolset: toolset.to_string(), missing });
    }

    Ok(tools)
}
