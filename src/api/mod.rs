// api/mod.rs

//! # Run Service Module
//!
//! The remote run service is reached through the [`RunService`] trait so the plan
//! pipeline can be driven against [`client::TfeClient`] in production and against
//! in-memory fakes in tests.
//!
//! Every call takes a `timeout`: the caller passes the remaining budget of the
//! overall deadline so a stalled request can never outlive it.

pub mod client;
pub mod types;

use std::time::Duration;

use crate::error::ApiResult;

pub use types::{Run, RunStatus, StatusClass, Workspace, WorkspaceRef};

/// Operations the plan pipeline needs from the remote run service.
pub trait RunService {
    /// Looks up a workspace by organization and name.
    fn read_workspace(&self, workspace: &WorkspaceRef, timeout: Duration) -> ApiResult<Workspace>;

    /// Creates a plan-only run against `workspace`.
    fn create_plan_only_run(
        &self,
        workspace: &Workspace,
        message: &str,
        timeout: Duration,
    ) -> ApiResult<Run>;

    /// Reads the current state of a run.
    fn read_run(&self, run_id: &str, timeout: Duration) -> ApiResult<Run>;

    /// Reads the JSON plan output of a finished plan as raw bytes.
    fn read_plan_json(&self, plan_id: &str, timeout: Duration) -> ApiResult<Vec<u8>>;
}
