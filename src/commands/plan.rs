// commands/plan.rs

//! # Plan Command Module
//!
//! Defines the `tfc-plan` command line and runs it: queue a plan-only run on the
//! configured workspace, wait for it to finish, and save the JSON plan output.
//!
//! Credentials and the target workspace come from environment variables (see
//! [`crate::core::config::env_help`]); everything else comes from flags.
//!
//! ## Example Usage
//! ```bash
//! TFC_TOKEN=... TFC_ORG=acme TFC_WORKSPACE=network-prod ./tfc-plan --out plan.json
//! ./tfc-plan -e TFC_WORKSPACE=network-staging --timeout 600
//! ```

use std::ffi::OsString;

use clap::{ArgMatches, Command};

use super::common_args::{
    env_file, env_overrides, env_var, log_level, message, options_from_matches, out,
    poll_interval, timeout,
};
use crate::api::client::TfeClient;
use crate::app::{APP_DESCRIPTION, APP_NAME, APP_VERSION, DEFAULT_ENV_FILE};
use crate::core::config::{env_help, Config};
use crate::core::env::load_env_vars;
use crate::error::{AppError, AppResult};
use crate::run::clock::{Clock, Deadline};
use crate::run::{execute_plan, PlanReport};
use crate::utils::display::{log_config, print_unicode_box};

/// Configures the `tfc-plan` command line.
pub fn command() -> Command {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(APP_DESCRIPTION)
        .after_help(env_help())
        .arg(out())
        .arg(timeout())
        .arg(poll_interval())
        .arg(message())
        .arg(env_file())
        .arg(env_var())
        .arg(log_level())
}

/// Rewrites the single-dash `-out FILE` / `-out=FILE` spelling into `--out`.
///
/// Without this, clap reads `-out` as `-o ut` and rejects the file name as an
/// unexpected positional argument.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some("-out") => OsString::from("--out"),
            Some(s) if s.starts_with("-out=") => OsString::from(format!("-{}", s)),
            _ => arg,
        })
        .collect()
}

/// Resolves the configuration from the parsed arguments and the environment.
///
/// No network activity happens here, so configuration problems surface first.
pub fn config_from_matches(matches: &ArgMatches) -> AppResult<Config> {
    let env_file = matches
        .get_one::<String>("env-file")
        .map(String::as_str)
        .unwrap_or(DEFAULT_ENV_FILE);
    let vars = load_env_vars(env_file, &env_overrides(matches));

    Config::resolve(&vars, options_from_matches(matches))
}

/// Executes the plan command.
///
/// The deadline starts on `clock` before configuration is loaded, so the whole
/// invocation fits in `--timeout`.
pub fn execute(matches: &ArgMatches, clock: &dyn Clock) -> AppResult<PlanReport> {
    let deadline = Deadline::after(clock, options_from_matches(matches).timeout);

    let config = config_from_matches(matches)?;
    log_config(&config);

    let client = TfeClient::new(&config.address, &config.token)
        .map_err(|e| AppError::Config(format!("cannot create API client: {}", e)))?;

    print_unicode_box(&format!(
        "🔮 Planning workspace [{}] in organization [{}]",
        config.workspace.name, config.workspace.organization
    ));

    execute_plan(&client, clock, &deadline, &config)
}
