// run/fake.rs

//! In-memory [`RunService`] for exercising the pipeline without a network.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::api::{Run, RunService, RunStatus, Workspace, WorkspaceRef};
use crate::error::{ApiError, ApiResult};
use crate::run::clock::{Clock, FakeClock};

/// What the fake answers to one status query.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(RunStatus),
    Errored(String),
    Unreachable,
}

/// Scripted run service. Status replies are consumed in order; the last one
/// repeats once the script runs out.
pub struct FakeService {
    clock: FakeClock,
    script: RefCell<VecDeque<Reply>>,
    pub plan_id: Option<String>,
    pub plan_body: Vec<u8>,
    pub missing_workspace: bool,
    pub fail_fetch: bool,
    pub workspace_reads: RefCell<u32>,
    pub runs_created: RefCell<u32>,
    /// Clock time and timeout of every status query.
    pub status_queries: RefCell<Vec<(Duration, Duration)>>,
    pub fetches: RefCell<Vec<String>>,
}

impl FakeService {
    pub fn new(clock: &FakeClock, script: Vec<Reply>) -> Self {
        Self {
            clock: clock.clone(),
            script: RefCell::new(script.into()),
            plan_id: Some("plan-P1".to_string()),
            plan_body: br#"{"format_version":"1.2","resource_changes":[]}"#.to_vec(),
            missing_workspace: false,
            fail_fetch: false,
            workspace_reads: RefCell::new(0),
            runs_created: RefCell::new(0),
            status_queries: RefCell::new(Vec::new()),
            fetches: RefCell::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.status_queries.borrow().len()
    }

    /// Total number of calls of any kind.
    pub fn network_calls(&self) -> usize {
        *self.workspace_reads.borrow() as usize
            + *self.runs_created.borrow() as usize
            + self.query_count()
            + self.fetches.borrow().len()
    }

    fn run(&self, status: RunStatus, message: &str) -> Run {
        Run {
            id: "run-1".to_string(),
            status,
            message: message.to_string(),
            plan_id: self.plan_id.clone(),
        }
    }

    fn next_reply(&self) -> Reply {
        let mut script = self.script.borrow_mut();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or(Reply::Unreachable)
        }
    }
}

impl RunService for FakeService {
    fn read_workspace(&self, workspace: &WorkspaceRef, _timeout: Duration) -> ApiResult<Workspace> {
        *self.workspace_reads.borrow_mut() += 1;
        if self.missing_workspace {
            return Err(ApiError::NotFound(format!(
                "workspace {}/{}",
                workspace.organization, workspace.name
            )));
        }
        Ok(Workspace {
            id: "ws-1".to_string(),
            name: workspace.name.clone(),
        })
    }

    fn create_plan_only_run(
        &self,
        _workspace: &Workspace,
        message: &str,
        _timeout: Duration,
    ) -> ApiResult<Run> {
        *self.runs_created.borrow_mut() += 1;
        Ok(self.run(RunStatus::Pending, message))
    }

    fn read_run(&self, run_id: &str, timeout: Duration) -> ApiResult<Run> {
        assert_eq!(run_id, "run-1");
        self.status_queries
            .borrow_mut()
            .push((self.clock.now(), timeout));

        match self.next_reply() {
            Reply::Status(status) => Ok(self.run(status, "")),
            Reply::Errored(message) => Ok(self.run(RunStatus::Errored, &message)),
            Reply::Unreachable => Err(ApiError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }

    fn read_plan_json(&self, plan_id: &str, _timeout: Duration) -> ApiResult<Vec<u8>> {
        self.fetches.borrow_mut().push(plan_id.to_string());
        if self.fail_fetch {
            return Err(ApiError::NotFound(format!("JSON output of plan {}", plan_id)));
        }
        Ok(self.plan_body.clone())
    }
}
