use travel_core::{Clock, SystemClock};
use travel_db::{seed_demo_requests, SeedResult, SqliteWarehouse};

use crate::commands::{async_runtime, load_config, open_migrated, CommandResult, EXIT_SEED};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match async_runtime("seed") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated(&config).await?;
        let warehouse = SqliteWarehouse::new(pool.clone());
        let clock = SystemClock;

        let seeded = seed_demo_requests(
            &warehouse,
            &config.warehouse.table_ref(),
            clock.today(),
            clock.now(),
        )
        .await
        .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED));

        pool.close().await;
        seeded
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", seed_message(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn seed_message(seeded: &SeedResult) -> String {
    let mut message = format!(
        "demo travel requests seeded: {} inserted, {} already present",
        seeded.inserted.len(),
        seeded.skipped.len()
    );
    if !seeded.inserted.is_empty() {
        message.push_str(&format!("\n  inserted: {}", seeded.inserted.join(", ")));
    }
    if !seeded.skipped.is_empty() {
        message.push_str(&format!("\n  skipped: {}", seeded.skipped.join(", ")));
    }
    message
}
