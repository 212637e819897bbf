use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use travel_cli::commands::{doctor, migrate, seed, tool};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert!(payload["error_class"].is_null());
    });
}

#[test]
fn migrate_returns_config_failure_for_unsafe_table_name() {
    with_env(
        &[
            ("TRAVEL_DATABASE_URL", "sqlite::memory:"),
            ("TRAVEL_WAREHOUSE_TABLE", "requests`; DROP TABLE x; --"),
        ],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 2, "expected config validation failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "config_validation");
        },
    );
}

#[test]
fn seed_inserts_every_demo_request_into_a_fresh_database() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().expect("message should be a string");
        assert!(message.starts_with("demo travel requests seeded: 7 inserted, 0 already present"));
        assert!(message.contains("demo-registrada-001"));
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("travel.db").display());

    with_env(&[("TRAVEL_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "first seed should succeed");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "second seed should succeed");
        let payload = parse_payload(&second.output);
        let message = payload["message"].as_str().expect("message should be a string");
        assert!(message.starts_with("demo travel requests seeded: 0 inserted, 7 already present"));
    });
}

#[test]
fn doctor_json_reports_ready_local_setup() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "pass");

        let checks = report["checks"].as_array().expect("checks array");
        let status_of = |name: &str| {
            checks
                .iter()
                .find(|check| check["name"] == name)
                .map(|check| check["status"].clone())
                .unwrap_or(Value::Null)
        };
        assert_eq!(status_of("config_validation"), "pass");
        assert_eq!(status_of("database_connectivity"), "pass");
        assert_eq!(status_of("travel_table"), "pass");
        assert_eq!(status_of("toolbox_readiness"), "skipped");
    });
}

#[test]
fn doctor_fails_when_config_is_invalid() {
    with_env(&[("TRAVEL_DATABASE_URL", "postgres://localhost/travel")], || {
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["name"], "config_validation");
        assert_eq!(report["checks"][0]["status"], "fail");
    });
}

#[test]
fn tool_relays_query_output_for_unrecognized_term() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let result = tool::run("get_travel_requests_by_status", r#"{"search_term":"xyz"}"#);
        assert_eq!(result.exit_code, 0, "tool-level errors are still a successful call");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        let output: Value = serde_json::from_str(
            payload["message"].as_str().expect("message should be a string"),
        )
        .expect("query output is JSON");
        assert!(output["error"]
            .as_str()
            .expect("error text")
            .starts_with("No pude interpretar el término de búsqueda de estado: 'xyz'."));
    });
}

#[test]
fn tool_books_a_request_with_future_dates() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let args = r#"{
            "employee_id": "EMP-7",
            "employee_first_name": "Ana",
            "employee_last_name": "Pérez",
            "origin_city": "Madrid",
            "destination_city": "Lisboa",
            "start_date": "2099-03-01",
            "end_date": "2099-03-04",
            "transport_mode": "Avión",
            "reason": "Congreso"
        }"#;
        let result = tool::run("request_travel_booking_logic", args);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().expect("message should be a string");
        assert!(message.contains("Ana Pérez"), "confirmation names the employee: {message}");
    });
}

#[test]
fn tool_rejects_non_object_arguments() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let result = tool::run("get_travel_requests_by_status", "[1, 2]");
        assert_eq!(result.exit_code, 8);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_arguments");
    });
}

#[test]
fn tool_reports_unknown_tool_names() {
    with_env(&[("TRAVEL_DATABASE_URL", "sqlite::memory:")], || {
        let result = tool::run("delete_everything", "{}");
        assert_eq!(result.exit_code, 9);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "unknown_tool");
        assert!(payload["message"]
            .as_str()
            .expect("message should be a string")
            .contains("update_travel_request_status"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TRAVEL_DATABASE_URL",
        "TRAVEL_DATABASE_MAX_CONNECTIONS",
        "TRAVEL_DATABASE_TIMEOUT_SECS",
        "TRAVEL_WAREHOUSE_PROJECT",
        "TRAVEL_WAREHOUSE_LOCATION",
        "TRAVEL_WAREHOUSE_DATASET",
        "TRAVEL_WAREHOUSE_TABLE",
        "TRAVEL_TOOLBOX_ENABLED",
        "TRAVEL_TOOLBOX_URL",
        "TRAVEL_TOOLBOX_TOOLSET",
        "TRAVEL_TOOLBOX_REQUIRED_TOOLS",
        "TRAVEL_TOOLBOX_API_TOKEN",
        "TRAVEL_TOOLBOX_TIMEOUT_SECS",
        "TRAVEL_LOGGING_LEVEL",
        "TRAVEL_LOGGING_FORMAT",
        "TRAVEL_LOG_LEVEL",
        "TRAVEL_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
