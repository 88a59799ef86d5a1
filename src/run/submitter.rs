// run/submitter.rs

//! Resolves the target workspace and queues a plan-only run against it.

use log::{debug, info};

use super::clock::{Clock, Deadline};
use super::{remaining_budget, RunHandle};
use crate::api::RunService;
use crate::core::config::Config;
use crate::error::{ApiError, AppError, AppResult};

/// Looks up the configured workspace and creates a plan-only run.
///
/// # Errors
/// Any failure of either call is returned as [`AppError::Submission`]; nothing
/// is retried.
pub fn submit(
    service: &dyn RunService,
    config: &Config,
    clock: &dyn Clock,
    deadline: &Deadline,
) -> AppResult<RunHandle> {
    let target = &config.workspace;
    let submission_error = |source: ApiError| AppError::Submission {
        organization: target.organization.clone(),
        workspace: target.name.clone(),
        source,
    };
    let waiting_for = || format!("workspace {}/{}", target.organization, target.name);

    let timeout = remaining_budget(deadline, clock, waiting_for)?;
    let workspace = service
        .read_workspace(target, timeout)
        .map_err(submission_error)?;
    debug!("Resolved workspace {}/{} to {}", target.organization, target.name, workspace.id);

    info!("Creating plan for {}/{}", target.organization, target.name);
    let timeout = remaining_budget(deadline, clock, waiting_for)?;
    let run = service
        .create_plan_only_run(&workspace, &config.options.message, timeout)
        .map_err(submission_error)?;
    info!("Run {} queued: {}", run.id, run.message);

    Ok(RunHandle::from(run))
}
