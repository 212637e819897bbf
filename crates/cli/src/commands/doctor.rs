use serde::Serialize;
use travel_agent::{resolve_toolset, HttpToolsetLoader, Tool};
use travel_core::config::{AppConfig, LoadOptions};
use travel_db::{connect_with_settings, migrations, DbPool, SqliteWarehouse, Statement, Warehouse};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Skipped, details: details.into() }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                "configuration loaded and validated",
            ));
            checks.extend(runtime_checks(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            for name in ["database_connectivity", "travel_table", "toolbox_readiness"] {
                checks.push(DoctorCheck::skipped(
                    name,
                    "skipped because configuration did not load",
                ));
            }
        }
    }

    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn runtime_checks(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck::fail(
                "database_connectivity",
                format!("failed to initialize async runtime: {error}"),
            )];
        }
    };

    runtime.block_on(async {
        let mut checks = Vec::new();

        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => {
                checks.push(DoctorCheck::pass(
                    "database_connectivity",
                    format!("connected using `{}`", config.database.url),
                ));
                Some(pool)
            }
            Err(error) => {
                checks.push(DoctorCheck::fail(
                    "database_connectivity",
                    format!("failed to connect to database: {error}"),
                ));
                None
            }
        };

        match &pool {
            Some(pool) => checks.push(check_travel_table(pool, config).await),
            None => checks.push(DoctorCheck::skipped(
                "travel_table",
                "skipped because the database is unreachable",
            )),
        }
        checks.push(check_toolbox(config).await);

        if let Some(pool) = pool {
            pool.close().await;
        }
        checks
    })
}

async fn check_travel_table(pool: &DbPool, config: &AppConfig) -> DoctorCheck {
    let table = config.warehouse.table_ref();
    if let Err(error) = migrations::run_pending(pool, &table).await {
        return DoctorCheck::fail("travel_table", format!("failed to prepare `{table}`: {error}"));
    }

    let warehouse = SqliteWarehouse::new(pool.clone());
    let count = Statement::new(
        format!("SELECT CAST(COUNT(*) AS TEXT) AS request_count FROM {}", table.quoted()),
        Vec::new(),
    );
    match warehouse.query(count).await {
        Ok(rows) => {
            let requests =
                rows.first().and_then(|row| row.get("request_count")).unwrap_or("0").to_string();
            DoctorCheck::pass(
                "travel_table",
                format!("`{table}` readable with {requests} requests"),
            )
        }
        Err(error) => DoctorCheck::fail("travel_table", format!("failed to read `{table}`: {error}")),
    }
}

async fn check_toolbox(config: &AppConfig) -> DoctorCheck {
    if !config.toolbox.enabled {
        return DoctorCheck::skipped("toolbox_readiness", "toolbox disabled; running local tools only");
    }

    let loader = match HttpToolsetLoader::new(&config.toolbox) {
        Ok(loader) => loader,
        Err(error) => return DoctorCheck::fail("toolbox_readiness", error.to_string()),
    };

    match resolve_toolset(&loader, &config.toolbox.toolset, &config.toolbox.required_tools).await {
        Ok(tools) => {
            let mut names: Vec<&str> = tools.iter().map(|tool| tool.name()).collect();
            names.sort_unstable();
            DoctorCheck::pass(
                "toolbox_readiness",
                format!("toolset `{}` loaded: {}", config.toolbox.toolset, names.join(", ")),
            )
        }
        Err(error) => DoctorCheck::fail("toolbox_readiness", error.to_string()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
