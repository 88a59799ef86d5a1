// core/config.rs

//! # Configuration Module
//!
//! Builds the immutable [`Config`] that the plan pipeline runs from. The config is
//! resolved once at startup from the merged environment variables (see
//! [`crate::core::env`]) and the command-line options, then passed by reference.
//!
//! All missing required variables are reported together so a user can fix them
//! in one go.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::WorkspaceRef;
use crate::app::{
    DEFAULT_ADDRESS, DEFAULT_OUT_FILE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RUN_MESSAGE,
    DEFAULT_TIMEOUT_SECS, ENV_ADDRESS, ENV_ORG, ENV_TOKEN, ENV_VARS, ENV_WORKSPACE,
};
use crate::error::{AppError, AppResult};

/// Options supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Where the plan document is written.
    pub out: PathBuf,
    /// Overall budget for the whole invocation.
    pub timeout: Duration,
    /// Wait between two status checks.
    pub poll_interval: Duration,
    /// Message attached to the queued run.
    pub message: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            out: PathBuf::from(DEFAULT_OUT_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            message: DEFAULT_RUN_MESSAGE.to_string(),
        }
    }
}

/// Fully resolved configuration for one plan invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub workspace: WorkspaceRef,
    pub address: String,
    pub options: PlanOptions,
}

impl Config {
    /// Resolve the configuration from environment variables and CLI options.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] naming every required variable that is
    /// missing or blank.
    pub fn resolve(vars: &HashMap<String, String>, options: PlanOptions) -> AppResult<Self> {
        let lookup = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let token = lookup(ENV_TOKEN);
        let organization = lookup(ENV_ORG);
        let workspace = lookup(ENV_WORKSPACE);

        let missing: Vec<&str> = [
            (ENV_TOKEN, token.is_none()),
            (ENV_ORG, organization.is_none()),
            (ENV_WORKSPACE, workspace.is_none()),
        ]
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(key, _)| *key)
        .collect();

        match (token, organization, workspace) {
            (Some(token), Some(organization), Some(name)) => Ok(Self {
                token,
                workspace: WorkspaceRef { organization, name },
                address: lookup(ENV_ADDRESS).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
                options,
            }),
            _ => Err(AppError::Config(format!(
                "required environment variable(s) not set: {}",
                missing.join(", ")
            ))),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("workspace", &self.workspace)
            .field("address", &self.address)
            .field("options", &self.options)
            .finish()
    }
}

/// Help text listing the environment variables the tool reads.
pub fn env_help() -> String {
    let mut help = String::from("Environment variables:\n");
    for (name, required, description) in ENV_VARS {
        let marker = if *required { "required" } else { "optional" };
        help.push_str(&format!("  {:<15} {} ({})\n", name, description, marker));
    }
    help
}
