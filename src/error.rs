// error.rs

//! # Error Handling Module
//!
//! This module defines the error types for tfc-plan. Errors come in two layers:
//!
//! - [`ApiError`] describes a failed call against the remote run service
//!   (transport failures, unexpected HTTP status codes, malformed documents).
//! - [`AppError`] describes which stage of the plan pipeline failed, carrying the
//!   organization, workspace, run or plan identifiers needed to diagnose it.
//!
//! Every `AppError` is fatal: `main` reports it and exits with a non-zero status.
//!
//! # Usage Example
//! ```rust
//! use crate::error::AppError;
//!
//! fn example_function() -> Result<(), AppError> {
//!     Err(AppError::Config("TFC_TOKEN is not set".to_string()))
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================
// Remote Service Errors
// ============================

/// Errors returned by a [`crate::api::RunService`] call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected.
    #[error("unauthorized: check that the API token is valid")]
    Unauthorized,

    /// The addressed resource does not exist or is not visible to the token.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON:API document.
    #[error("invalid response document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response document lacked a field the pipeline depends on.
    #[error("response is missing {0}")]
    MissingField(&'static str),

    /// The service address could not be turned into a request URL.
    #[error("invalid service address: {0}")]
    InvalidAddress(String),
}

/// Type alias for remote service results
pub type ApiResult<T> = Result<T, ApiError>;

// ============================
// Application Error Definitions
// ============================

/// Represents the fatal outcomes of a plan invocation.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required configuration is missing or invalid. Raised before any network call.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The workspace could not be resolved or the run could not be created.
    #[error("unable to create plan for workspace {organization}/{workspace}: {source}")]
    Submission {
        organization: String,
        workspace: String,
        #[source]
        source: ApiError,
    },

    /// Reading the run status failed.
    #[error("unable to check plan status for run {run_id}: {source}")]
    Query {
        run_id: String,
        #[source]
        source: ApiError,
    },

    /// The remote service reported the run as errored.
    #[error("run {run_id} errored: {message}")]
    RunFailed { run_id: String, message: String },

    /// The overall deadline passed before the pipeline finished. `waiting_for`
    /// names what was outstanding, e.g. `run run-abc`.
    #[error("timeout waiting for {waiting_for} after {}s", .timeout.as_secs())]
    DeadlineExceeded {
        waiting_for: String,
        timeout: Duration,
    },

    /// Retrieving the plan JSON output failed.
    #[error("unable to read plan output for plan {plan_id}: {source}")]
    Fetch {
        plan_id: String,
        #[source]
        source: ApiError,
    },

    /// Writing the plan document to disk failed.
    #[error("unable to write plan to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for pipeline results
pub type AppResult<T> = Result<T, AppError>;
