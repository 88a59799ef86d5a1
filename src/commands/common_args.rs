// commands/common_args.rs

//! # Command Arguments
//!
//! Argument definitions for the `tfc-plan` command line, and the conversion of
//! parsed matches into [`PlanOptions`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches};

use crate::app::{
    DEFAULT_ENV_FILE, DEFAULT_LOG_LEVEL, DEFAULT_OUT_FILE, DEFAULT_POLL_INTERVAL_SECS_STR,
    DEFAULT_RUN_MESSAGE, DEFAULT_TIMEOUT_SECS_STR, LOG_LEVELS, MAX_DURATION_SECS,
};
use crate::core::config::PlanOptions;

/// Argument for the plan output file
pub fn out() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .help("Output file for the plan")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_OUT_FILE)
}

/// Argument for the overall deadline
pub fn timeout() -> Arg {
    Arg::new("timeout")
        .long("timeout")
        .value_name("SECONDS")
        .help("Give up if the plan has not finished within this many seconds")
        .value_parser(value_parser!(u64).range(1..=MAX_DURATION_SECS))
        .default_value(DEFAULT_TIMEOUT_SECS_STR)
}

/// Argument for the wait between status checks
pub fn poll_interval() -> Arg {
    Arg::new("poll-interval")
        .long("poll-interval")
        .value_name("SECONDS")
        .help("Seconds to wait between plan status checks")
        .value_parser(value_parser!(u64).range(1..=MAX_DURATION_SECS))
        .default_value(DEFAULT_POLL_INTERVAL_SECS_STR)
}

/// Argument for the message attached to the run
pub fn message() -> Arg {
    Arg::new("message")
        .long("message")
        .help("Message attached to the queued run")
        .default_value(DEFAULT_RUN_MESSAGE)
}

/// Argument for setting the log level
pub fn log_level() -> Arg {
    Arg::new("log-level")
        .long("log-level")
        .help("Set the logging level")
        .value_parser(clap::builder::PossibleValuesParser::new(LOG_LEVELS))
        .ignore_case(true)
        .default_value(DEFAULT_LOG_LEVEL)
}

/// Argument for specifying an environment file
pub fn env_file() -> Arg {
    Arg::new("env-file")
        .long("env-file")
        .help("Environment variables file")
        .default_value(DEFAULT_ENV_FILE)
}

/// Argument for setting additional environment variables
pub fn env_var() -> Arg {
    Arg::new("env")
        .short('e')
        .long("env")
        .help("Set additional environment variables (format: KEY=VALUE)")
        .action(ArgAction::Append)
}

/// Build [`PlanOptions`] from parsed matches.
///
/// Every option has a default, so missing values fall back to it.
pub fn options_from_matches(matches: &ArgMatches) -> PlanOptions {
    let defaults = PlanOptions::default();
    PlanOptions {
        out: matches
            .get_one::<PathBuf>("out")
            .cloned()
            .unwrap_or(defaults.out),
        timeout: matches
            .get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.timeout),
        poll_interval: matches
            .get_one::<u64>("poll-interval")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(defaults.poll_interval),
        message: matches
            .get_one::<String>("message")
            .cloned()
            .unwrap_or(defaults.message),
    }
}

/// Collect the `-e KEY=VALUE` overrides.
pub fn env_overrides(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("env")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
