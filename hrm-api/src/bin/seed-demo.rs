//! Populate the database with demo departments, roles, projects and
//! employees.
//!
//! Usage: `seed-demo [--employees N] [--seed S]`

use clap::Parser;
use hrm_api::seed::{seed_demo, SeedOptions, DEFAULT_EMPLOYEES};
use hrm_api::telemetry::{init_tracing, TelemetryConfig};
use hrm_api::{ApiResult, DbClient, DbConfig};

#[derive(Parser, Debug)]
#[command(name = "seed-demo")]
#[command(about = "Seed the HRM database with demo data", version)]
struct Cli {
    /// Number of employees to create
    #[arg(long, default_value_t = DEFAULT_EMPLOYEES)]
    employees: usize,

    /// Fixed RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> ApiResult<()> {
    let cli = Cli::parse();
    init_tracing(&TelemetryConfig::default())?;

    let db = DbClient::from_config(&DbConfig::from_env())?;
    db.migrate().await?;

    let options = SeedOptions {
        employees: cli.employees,
        rng_seed: cli.seed,
        ..SeedOptions::default()
    };
    let report = seed_demo(&db, &options).await?;

    println!("Seeded demo data with {} employees.", report.employees_created);
    Ok(())
}
