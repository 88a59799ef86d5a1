// run/fetcher.rs

//! Retrieves the JSON plan output of a finished plan.

use log::debug;

use super::clock::{Clock, Deadline};
use super::{remaining_budget, PlanDocument};
use crate::api::RunService;
use crate::error::{AppError, AppResult};

/// Issues exactly one request for the plan document of `plan_id`.
///
/// No request is made once the deadline has passed.
pub fn fetch_plan(
    service: &dyn RunService,
    clock: &dyn Clock,
    deadline: &Deadline,
    plan_id: &str,
) -> AppResult<PlanDocument> {
    let timeout = remaining_budget(deadline, clock, || format!("plan output {}", plan_id))?;

    let bytes = service
        .read_plan_json(plan_id, timeout)
        .map_err(|source| AppError::Fetch {
            plan_id: plan_id.to_string(),
            source,
        })?;
    debug!("Fetched {} bytes of plan output for {}", bytes.len(), plan_id);

    Ok(PlanDocument::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RunStatus;
    use crate::error::ApiError;
    use crate::run::clock::FakeClock;
    use crate::run::fake::{FakeService, Reply};
    use std::time::Duration;

    #[test]
    fn test_fetch_returns_bytes_verbatim() {
        let clock = FakeClock::new();
        let mut service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);
        service.plan_body = b"{\"planned_values\":{}}\n".to_vec();
        let deadline = Deadline::after(&clock, Duration::from_secs(30));

        let doc = fetch_plan(&service, &clock, &deadline, "plan-P1").unwrap();

        assert_eq!(doc.as_bytes(), b"{\"planned_values\":{}}\n");
        assert_eq!(*service.fetches.borrow(), vec!["plan-P1".to_string()]);
    }

    #[test]
    fn test_fetch_failure_names_plan() {
        let clock = FakeClock::new();
        let mut service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);
        service.fail_fetch = true;
        let deadline = Deadline::after(&clock, Duration::from_secs(30));

        let err = fetch_plan(&service, &clock, &deadline, "plan-P1").unwrap_err();

        assert!(matches!(
            err,
            AppError::Fetch { ref plan_id, source: ApiError::NotFound(_) } if plan_id == "plan-P1"
        ));
    }

    #[test]
    fn test_no_fetch_after_deadline() {
        let clock = FakeClock::new();
        let service = FakeService::new(&clock, vec![Reply::Status(RunStatus::Pending)]);
        let deadline = Deadline::after(&clock, Duration::from_secs(30));
        clock.advance(Duration::from_secs(31));

        let err = fetch_plan(&service, &clock, &deadline, "plan-P1").unwrap_err();

        assert!(matches!(
            err,
            AppError::DeadlineExceeded { ref waiting_for, .. } if waiting_for == "plan output plan-P1"
        ));
        assert!(service.fetches.borrow().is_empty());
    }
}
