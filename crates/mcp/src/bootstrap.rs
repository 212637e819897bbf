use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use travel_agent::{
    resolve_toolset, AgentRuntime, HttpToolsetLoader, InstructionError, Tool, ToolContext,
    ToolsetError, ToolsetLoader,
};
use travel_core::config::{AppConfig, ConfigError, LoadOptions};
use travel_core::SystemClock;
use travel_db::{connect_with_settings, migrations, DbPool, SqliteWarehouse};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("remote toolset could not be resolved: {0}")]
    Toolset(#[from] ToolsetError),
    #[error(transparent)]
    Instruction(#[from] InstructionError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Starts from an already loaded configuration. The toolbox is contacted only
/// when `toolbox.enabled` is set.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    if config.toolbox.enabled {
        let loader = HttpToolsetLoader::new(&config.toolbox)?;
        bootstrap_with_loader(config, Some(&loader as &dyn ToolsetLoader)).await
    } else {
        bootstrap_with_loader(config, None).await
    }
}

pub async fn bootstrap_with_loader(
    config: AppConfig,
    loader: Option<&dyn ToolsetLoader>,
) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting travel desk bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    let table = config.warehouse.table_ref();
    migrations::run_pending(&db_pool, &table).await.map_err(BootstrapError::Migration)?;

    let remote_tools: Vec<Arc<dyn Tool>> = match loader {
        Some(loader) => {
            let tools =
                resolve_toolset(loader, &config.toolbox.toolset, &config.toolbox.required_tools)
                    .await?;
            info!(
                event_name = "system.bootstrap.toolset_resolved",
                correlation_id = "bootstrap",
                toolset = %config.toolbox.toolset,
                tools = tools.len(),
                "remote toolset resolved"
            );
            tools
        }
        None => Vec::new(),
    };

    let context = ToolContext {
        warehouse: Arc::new(SqliteWarehouse::new(db_pool.clone())),
        table,
        clock: Arc::new(SystemClock),
    };
    let runtime = AgentRuntime::build(context, remote_tools)?;

    Ok(Application { config, db_pool, runtime: Arc::new(runtime) })
}
