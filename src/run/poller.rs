// run/poller.rs

//! # Run Poller
//!
//! Drives a [`RunHandle`] to a terminal status under a [`Deadline`].
//!
//! The poller is a four-state machine:
//!
//! | State       | Terminal | Left when                                    |
//! |-------------|----------|----------------------------------------------|
//! | `Polling`   | no       | a status query classifies the run            |
//! | `Succeeded` | yes      |                                              |
//! | `Failed`    | yes      |                                              |
//! | `TimedOut`  | yes      |                                              |
//!
//! Each [`Poller::step`] first checks the deadline, so no status query is ever
//! issued once it has passed. Pending statuses are followed by one fixed
//! interval of sleep. Query failures are fatal.

use std::time::Duration;

use log::info;

use super::clock::{Clock, Deadline};
use super::RunHandle;
use crate::api::{RunService, RunStatus, StatusClass};
use crate::error::{ApiError, AppError, AppResult};

/// State of the polling loop after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Succeeded { plan_id: String },
    Failed { message: String },
    TimedOut,
}

/// Polls one run's status at a fixed interval.
pub struct Poller<'a> {
    service: &'a dyn RunService,
    clock: &'a dyn Clock,
    interval: Duration,
}

impl<'a> Poller<'a> {
    pub fn new(service: &'a dyn RunService, clock: &'a dyn Clock, interval: Duration) -> Self {
        Self {
            service,
            clock,
            interval,
        }
    }

    /// Performs one iteration of the loop.
    ///
    /// Returns `TimedOut` without touching the service when the deadline has
    /// passed. A pending status sleeps one interval before returning `Polling`.
    ///
    /// # Errors
    /// [`AppError::Query`] when the status read fails, or when a successful run
    /// carries no plan id.
    pub fn step(&self, handle: &mut RunHandle, deadline: &Deadline) -> AppResult<PollState> {
        let Some(timeout) = deadline.remaining(self.clock) else {
            return Ok(PollState::TimedOut);
        };

        info!("Checking plan status (run {})", handle.id);
        let run = self
            .service
            .read_run(&handle.id, timeout)
            .map_err(|source| AppError::Query {
                run_id: handle.id.clone(),
                source,
            })?;

        handle.status = run.status;
        handle.message = run.message;
        if run.plan_id.is_some() {
            handle.plan_id = run.plan_id;
        }

        match handle.status.classify() {
            StatusClass::Succeeded => match &handle.plan_id {
                Some(plan_id) => Ok(PollState::Succeeded {
                    plan_id: plan_id.clone(),
                }),
                None => Err(AppError::Query {
                    run_id: handle.id.clone(),
                    source: ApiError::MissingField("plan id"),
                }),
            },
            StatusClass::Failed => Ok(PollState::Failed {
                message: handle.message.clone(),
            }),
            StatusClass::Pending => {
                info!(
                    "{}",
                    wait_message(&handle.status, self.interval, deadline.remaining(self.clock))
                );
                self.clock.sleep(self.interval);
                Ok(PollState::Polling)
            }
        }
    }

    /// Polls until the run is terminal and returns the plan id of a successful run.
    ///
    /// # Errors
    /// - [`AppError::RunFailed`] when the service reports the run as errored.
    /// - [`AppError::DeadlineExceeded`] when the deadline passes first.
    /// - [`AppError::Query`] as for [`Poller::step`].
    pub fn poll(&self, mut handle: RunHandle, deadline: &Deadline) -> AppResult<String> {
        loop {
            match self.step(&mut handle, deadline)? {
                PollState::Polling => continue,
                PollState::Succeeded { plan_id } => return Ok(plan_id),
                PollState::Failed { message } => {
                    return Err(AppError::RunFailed {
                        run_id: handle.id,
                        message,
                    })
                }
                PollState::TimedOut => {
                    return Err(AppError::DeadlineExceeded {
                        waiting_for: format!("run {}", handle.id),
                        timeout: deadline.budget(),
                    })
                }
            }
        }
    }
}

/// Progress line for a pending run, naming the deadline when it falls before
/// the next check.
fn wait_message(status: &RunStatus, interval: Duration, remaining: Option<Duration>) -> String {
    match remaining {
        Some(left) if left > interval => format!(
            "Wait for plan to complete (current status: {}, next check in {}s, {}s left before timeout)",
            status,
            interval.as_secs(),
            left.as_secs()
        ),
        Some(left) => format!(
            "Wait for plan to complete (current status: {}, timeout in {}s, before the next check)",
            status,
            left.as_secs()
        ),
        None => format!(
            "Wait for plan to complete (current status: {}, timeout reached)",
            status
        ),
    }
}
