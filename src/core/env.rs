// core/env.rs

//! # Environment Variable Handling
//!
//! Collects the variables tfc-plan is configured from. Sources are applied in
//! order, later ones winning:
//!
//! 1. a dotenv file (skipped when absent)
//! 2. the process environment
//! 3. `-e KEY=VALUE` overrides from the command line
//!
//! Only keys are ever logged, never values.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

use crate::app::ENV_VARS;

/// Load environment variables from a dotenv file, the process environment and CLI overrides.
///
/// # Arguments
/// * `env_file` - Path to the dotenv file (relative to cwd)
/// * `overrides` - Additional KEY=VALUE pairs from `-e` CLI flags
pub fn load_env_vars(env_file: &str, overrides: &[String]) -> HashMap<String, String> {
    merge_env_vars(Path::new(env_file), std::env::vars(), overrides)
}

/// Merge the three variable sources. Split out from [`load_env_vars`] so the
/// process environment can be substituted in tests.
pub fn merge_env_vars(
    dotenv_path: &Path,
    process_env: impl IntoIterator<Item = (String, String)>,
    overrides: &[String],
) -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if dotenv_path.exists() {
        debug!("Loading environment variables from: {}", dotenv_path.display());
        match dotenvy::from_path_iter(dotenv_path) {
            Ok(iter) => {
                for (key, value) in iter.flatten() {
                    debug!("  Loaded env var: {}", key);
                    env_vars.insert(key, value);
                }
            }
            Err(e) => {
                warn!("Could not load {}: {}", dotenv_path.display(), e);
            }
        }
    } else {
        debug!("No dotenv file found at: {}", dotenv_path.display());
    }

    for (key, value) in process_env {
        if ENV_VARS.iter().any(|(name, _, _)| *name == key) {
            debug!("  Process env var: {}", key);
            env_vars.insert(key, value);
        }
    }

    for override_str in overrides {
        match parse_env_var(override_str) {
            Some((key, value)) => {
                debug!("  Override env var: {}", key);
                env_vars.insert(key, value);
            }
            None => warn!("Ignoring malformed override (expected KEY=VALUE): {}", override_str),
        }
    }

    env_vars
}

/// Parse a single KEY=VALUE environment variable string.
fn parse_env_var(s: &str) -> Option<(String, String)> {
    let (key, value) = s.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
