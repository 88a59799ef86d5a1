// main.rs

//! # tfc-plan - Main Entry Point
//!
//! Queues a plan-only run on a Terraform Cloud / Terraform Enterprise workspace,
//! waits for the plan to finish, and writes the JSON plan output to a file.
//!
//! ## Configuration
//!
//! - `TFC_TOKEN`, `TFC_ORG`, `TFC_WORKSPACE` (required) and `TFE_ADDRESS`
//!   (optional) are read from the environment, a dotenv file, or `-e KEY=VALUE`.
//! - `--out`, `--timeout`, `--poll-interval`, `--message` and `--log-level`
//!   control the run.
//!
//! ## Example Usage
//! ```bash
//! ./tfc-plan --out plan.json
//! ./tfc-plan --env-file prod.env --timeout 600 --log-level debug
//! ```
//!
//! Exits `0` once the plan is written and `1` on any failure.

mod api;
mod app;
mod commands;
mod core;
mod error;
mod run;
mod utils;

use std::env;
use std::process;

use log::{debug, error};

use crate::core::config::env_help;
use crate::error::AppError;
use crate::run::clock::SystemClock;
use crate::utils::logging::initialize_logger;

/// Main function that parses the CLI and runs the plan.
fn main() {
    // The --timeout budget is measured from here.
    let clock = SystemClock::new();

    let matches = commands::plan::command()
        .get_matches_from(commands::plan::normalize_legacy_args(env::args_os()));

    // ====================
    // Initialize Logger
    // ====================
    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or(app::DEFAULT_LOG_LEVEL);
    initialize_logger(log_level);

    debug!("Logger initialized with level: {}", log_level);

    // ====================
    // Command Execution
    // ====================
    match commands::plan::execute(&matches, &clock) {
        Ok(report) => {
            print_success!(
                "Plan {} from run {} written to {} ({} bytes)",
                report.plan_id,
                report.run_id,
                report.out.display(),
                report.bytes_written
            );
        }
        Err(err) => {
            error!("{}", err);
            print_error!("{}", err);
            if let AppError::Config(_) = err {
                eprintln!();
                eprintln!("{}", env_help());
            }
            process::exit(1);
        }
    }
}
