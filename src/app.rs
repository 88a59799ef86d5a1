// app.rs

//! # Application Constants
//!
//! Names, defaults and environment variable keys shared across the application.

pub const APP_NAME: &str = "tfc-plan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str =
    "Queue a plan-only run on a Terraform Cloud workspace and save the JSON plan output";

// ============================
// Defaults
// ============================

pub const DEFAULT_OUT_FILE: &str = "out.json";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS_STR: &str = "300";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_INTERVAL_SECS_STR: &str = "5";
/// Upper bound for `--timeout` and `--poll-interval`, in seconds (one day).
pub const MAX_DURATION_SECS: u64 = 86_400;
pub const DEFAULT_RUN_MESSAGE: &str = "Queued by tfc-plan";
pub const DEFAULT_ADDRESS: &str = "https://app.terraform.io";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ============================
// Environment Variables
// ============================

pub const ENV_TOKEN: &str = "TFC_TOKEN";
pub const ENV_ORG: &str = "TFC_ORG";
pub const ENV_WORKSPACE: &str = "TFC_WORKSPACE";
pub const ENV_ADDRESS: &str = "TFE_ADDRESS";

/// Every variable the tool reads, with whether it is required and what it holds.
pub const ENV_VARS: &[(&str, bool, &str)] = &[
    (ENV_TOKEN, true, "API Token for TFC/TFE"),
    (ENV_ORG, true, "TFC/TFE Organization"),
    (ENV_WORKSPACE, true, "TFC/TFE Workspace"),
    (ENV_ADDRESS, false, "TFC/TFE address (default: https://app.terraform.io)"),
];
