// run/mod.rs

//! # Run Lifecycle Module
//!
//! Drives one plan-only run from submission to a saved plan document:
//!
//! ```text
//! submit ──▶ poll (until terminal or deadline) ──▶ fetch plan JSON ──▶ write file
//! ```
//!
//! Every stage runs against the same [`Deadline`], fixed by the caller when the
//! process starts. Any failure aborts the whole pipeline; only pending run statuses are
//! retried, by the poller.

pub mod clock;
pub mod fetcher;
pub mod poller;
pub mod submitter;

#[cfg(test)]
pub mod fake;

use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::api::{Run, RunService, RunStatus};
use crate::core::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::output::write_plan;
use clock::{Clock, Deadline};
use fetcher::fetch_plan;
use poller::Poller;
use submitter::submit;

/// The single run tracked by an invocation.
///
/// Created by the submitter and then owned by the poller, which is the only
/// code that updates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub id: String,
    pub status: RunStatus,
    pub message: String,
    pub plan_id: Option<String>,
}

impl From<Run> for RunHandle {
    fn from(run: Run) -> Self {
        Self {
            id: run.id,
            status: run.status,
            message: run.message,
            plan_id: run.plan_id,
        }
    }
}

/// Raw plan JSON as returned by the service. Never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument(Vec<u8>);

impl PlanDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Summary of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub run_id: String,
    pub plan_id: String,
    pub out: PathBuf,
    pub bytes_written: usize,
}

/// Remaining budget before `deadline`, or [`AppError::DeadlineExceeded`] naming
/// what was still outstanding.
pub(crate) fn remaining_budget(
    deadline: &Deadline,
    clock: &dyn Clock,
    waiting_for: impl FnOnce() -> String,
) -> AppResult<Duration> {
    deadline
        .remaining(clock)
        .ok_or_else(|| AppError::DeadlineExceeded {
            waiting_for: waiting_for(),
            timeout: deadline.budget(),
        })
}

/// Runs the full pipeline: submit, poll to success, fetch, write.
///
/// `deadline` is taken as given; time already spent before the call counts
/// against it.
pub fn execute_plan(
    service: &dyn RunService,
    clock: &dyn Clock,
    deadline: &Deadline,
    config: &Config,
) -> AppResult<PlanReport> {
    let handle = submit(service, config, clock, deadline)?;
    let run_id = handle.id.clone();

    let poller = Poller::new(service, clock, config.options.poll_interval);
    let plan_id = poller.poll(handle, deadline)?;
    info!("Plan complete (run {}, plan {})", run_id, plan_id);

    let document = fetch_plan(service, clock, deadline, &plan_id)?;
    write_plan(&config.options.out, &document)?;
    info!(
        "Successfully written plan to {} ({} bytes)",
        config.options.out.display(),
        document.len()
    );

    Ok(PlanReport {
        run_id,
        plan_id,
        out: config.options.out.clone(),
        bytes_written: document.len(),
    })
}

/// Pipeline tests against the scripted service.
#[cfg(test)]
mod tests {
    use super::*;
    use super::clock::FakeClock;
    use crate::api::WorkspaceRef;
    use crate::core::config::PlanOptions;
    use super::fake::{FakeService, Reply};
    use std::fs;
    use tempfile::TempDir;

    /// Runs the pipeline with a deadline starting now.
    fn run_pipeline(service: &FakeService, clock: &FakeClock, config: &Config) -> AppResult<PlanReport> {
        let deadline = Deadline::after(clock, config.options.timeout);
        execute_plan(service, clock, &deadline, config)
    }

    fn config(out: PathBuf, timeout_secs: u64) -> Config {
        Config {
            token: "token".to_string(),
            workspace: WorkspaceRef {
                organization: "acme".to_string(),
                name: "network-prod".to_string(),
            },
            address: "https://app.terraform.io".to_string(),
            options: PlanOptions {
                out,
                timeout: Duration::from_secs(timeout_secs),
                poll_interval: Duration::from_secs(5),
                message: "test run".to_string(),
            },
        }
    }

    #[test]
    fn test_pending_pending_succeeded_fetches_and_writes() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("plan.json");
        let clock = FakeClock::new();
        let service = FakeService::new(
            &clock,
            vec![
                Reply::Status(RunStatus::Pending),
                Reply::Status(RunStatus::Pending),
                Reply::Status(RunStatus::PlannedAndFinished),
            ],
        );

        let report = run_pipeline(&service, &clock, &config(out.clone(), 300)).unwrap();

        assert_eq!(service.query_count(), 3);
        assert_eq!(*service.fetches.borrow(), vec!["plan-P1".to_string()]);
        assert_eq!(fs::read(&out).unwrap(), service.plan_body);
        assert_eq!(report.plan_id, "plan-P1");
        assert_eq!(report.run_id, "run-1");
        assert_eq!(report.bytes_written, service.plan_body.len());
    }

    #[test]
    fn test_errored_run_fails_without_fetch() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("plan.json");
        let clock = FakeClock::new();
        let service = FakeService::new(
            &clock,
            vec![
                Reply::Status(RunStatus::Pending),
                Reply::Errored("bad config".to_string()),
            ],
        );

        let err = run_pipeline(&service, &clock, &config(out.clone(), 300)).unwrap_err();

        assert_eq!(service.query_count(), 2);
        assert!(service.fetches.borrow().is_empty());
        assert!(err.to_string().contains("bad config"));
        assert!(!out.exists());
    }

    #[test]
    fn test_deadline_bounds_queries() {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::new();
        let service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);

        let err = run_pipeline(&service, &clock, &config(dir.path().join("p.json"), 10))
            .unwrap_err();

        assert!(matches!(err, AppError::DeadlineExceeded { .. }));
        assert!(service.query_count() <= 2);
        assert!(service.fetches.borrow().is_empty());
        for (at, timeout) in service.status_queries.borrow().iter() {
            assert!(*at < Duration::from_secs(10));
            assert!(*at + *timeout <= Duration::from_secs(10));
        }
    }

    #[test]
    fn test_rerun_produces_identical_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("plan.json");
        fs::write(&out, b"stale content that is longer than the plan document itself").unwrap();

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let clock = FakeClock::new();
            let service =
                FakeService::new(&clock, vec![Reply::Status(RunStatus::PlannedAndFinished)]);
            run_pipeline(&service, &clock, &config(out.clone(), 300)).unwrap();
            outputs.push(fs::read(&out).unwrap());
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], br#"{"format_version":"1.2","resource_changes":[]}"#.to_vec());
    }

    #[test]
    fn test_submission_failure_stops_before_polling() {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::new();
        let mut service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);
        service.missing_workspace = true;

        let err = run_pipeline(&service, &clock, &config(dir.path().join("p.json"), 300))
            .unwrap_err();

        match err {
            AppError::Submission {
                organization,
                workspace,
                ..
            } => {
                assert_eq!(organization, "acme");
                assert_eq!(workspace, "network-prod");
            }
            other => panic!("Expected Submission error, got {:?}", other),
        }
        assert_eq!(*service.runs_created.borrow(), 0);
        assert_eq!(service.query_count(), 0);
    }

    #[test]
    fn test_fetch_failure_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("plan.json");
        let clock = FakeClock::new();
        let mut service =
            FakeService::new(&clock, vec![Reply::Status(RunStatus::PlannedAndFinished)]);
        service.fail_fetch = true;

        let err = run_pipeline(&service, &clock, &config(out.clone(), 300)).unwrap_err();

        assert!(matches!(err, AppError::Fetch { ref plan_id, .. } if plan_id == "plan-P1"));
        assert_eq!(service.fetches.borrow().len(), 1);
        assert!(!out.exists());
    }

    #[test]
    fn test_write_failure_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("missing-dir").join("plan.json");
        let clock = FakeClock::new();
        let service = FakeService::new(&clock, vec![Reply::Status(RunStatus::PlannedAndFinished)]);

        let err = run_pipeline(&service, &clock, &config(out.clone(), 300)).unwrap_err();

        assert!(matches!(err, AppError::Write { ref path, .. } if *path == out));
    }

    #[test]
    fn test_time_spent_before_the_pipeline_counts_against_deadline() {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::new();
        let service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);
        let config = config(dir.path().join("p.json"), 10);

        let deadline = Deadline::after(&clock, config.options.timeout);
        clock.advance(Duration::from_secs(7));
        let err = execute_plan(&service, &clock, &deadline, &config).unwrap_err();

        assert!(matches!(err, AppError::DeadlineExceeded { .. }));
        assert_eq!(service.query_count(), 1);
        let (at, timeout) = service.status_queries.borrow()[0];
        assert_eq!(at, Duration::from_secs(7));
        assert_eq!(timeout, Duration::from_secs(3));
    }
}
