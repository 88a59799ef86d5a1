// api/types.rs

//! # Run Service Types
//!
//! Domain types exchanged with the remote run service, plus the JSON:API
//! documents they are read from and written to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// A workspace addressed by organization and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRef {
    pub organization: String,
    pub name: String,
}

/// A workspace as resolved by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

/// A run as last reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub message: String,
    pub plan_id: Option<String>,
}

/// The three semantic buckets a [`RunStatus`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Pending,
    Succeeded,
    Failed,
}

/// Every run status the service documents.
///
/// Statuses this client does not know about parse into [`RunStatus::Unknown`]
/// and are treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Fetching,
    FetchingCompleted,
    PrePlanRunning,
    PrePlanCompleted,
    Queuing,
    PlanQueued,
    Planning,
    Planned,
    CostEstimating,
    CostEstimated,
    PolicyChecking,
    PolicyOverride,
    PolicySoftFailed,
    PolicyChecked,
    Confirmed,
    PostPlanRunning,
    PostPlanCompleted,
    PlannedAndFinished,
    PlannedAndSaved,
    ApplyQueued,
    Applying,
    Applied,
    Discarded,
    Errored,
    Canceled,
    ForceCanceled,
    Unknown(String),
}

const KNOWN_STATUSES: &[(&str, RunStatus)] = &[
    ("pending", RunStatus::Pending),
    ("fetching", RunStatus::Fetching),
    ("fetching_completed", RunStatus::FetchingCompleted),
    ("pre_plan_running", RunStatus::PrePlanRunning),
    ("pre_plan_completed", RunStatus::PrePlanCompleted),
    ("queuing", RunStatus::Queuing),
    ("plan_queued", RunStatus::PlanQueued),
    ("planning", RunStatus::Planning),
    ("planned", RunStatus::Planned),
    ("cost_estimating", RunStatus::CostEstimating),
    ("cost_estimated", RunStatus::CostEstimated),
    ("policy_checking", RunStatus::PolicyChecking),
    ("policy_override", RunStatus::PolicyOverride),
    ("policy_soft_failed", RunStatus::PolicySoftFailed),
    ("policy_checked", RunStatus::PolicyChecked),
    ("confirmed", RunStatus::Confirmed),
    ("post_plan_running", RunStatus::PostPlanRunning),
    ("post_plan_completed", RunStatus::PostPlanCompleted),
    ("planned_and_finished", RunStatus::PlannedAndFinished),
    ("planned_and_saved", RunStatus::PlannedAndSaved),
    ("apply_queued", RunStatus::ApplyQueued),
    ("applying", RunStatus::Applying),
    ("applied", RunStatus::Applied),
    ("discarded", RunStatus::Discarded),
    ("errored", RunStatus::Errored),
    ("canceled", RunStatus::Canceled),
    ("force_canceled", RunStatus::ForceCanceled),
];

impl RunStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        if let Self::Unknown(s) = self {
            return s;
        }
        KNOWN_STATUSES
            .iter()
            .find(|(_, status)| status == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Classifies the status into pending, success-terminal or failure-terminal.
    ///
    /// Only `planned_and_finished` counts as success: the plan is done and no
    /// apply stage follows. Only `errored` counts as failure.
    pub fn classify(&self) -> StatusClass {
        match self {
            Self::PlannedAndFinished => StatusClass::Succeeded,
            Self::Errored => StatusClass::Failed,
            _ => StatusClass::Pending,
        }
    }
}

impl FromStr for RunStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(KNOWN_STATUSES
            .iter()
            .find(|(name, _)| *name == trimmed)
            .map(|(_, status)| status.clone())
            .unwrap_or_else(|| Self::Unknown(trimmed.to_string())))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================
// JSON:API Documents
// ============================

#[derive(Debug, Deserialize)]
struct Document<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    data: Option<ResourceIdentifier>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResourceIdentifier {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct WorkspaceData {
    id: String,
    attributes: WorkspaceAttributes,
}

#[derive(Debug, Deserialize)]
struct WorkspaceAttributes {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RunData {
    id: String,
    attributes: RunAttributes,
    #[serde(default)]
    relationships: RunRelationships,
}

#[derive(Debug, Deserialize)]
struct RunAttributes {
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RunRelationships {
    plan: Option<Relationship>,
}

/// Parses a workspace document as returned by the workspace lookup endpoint.
pub fn parse_workspace(body: &[u8]) -> ApiResult<Workspace> {
    let doc: Document<WorkspaceData> = serde_json::from_slice(body)?;
    Ok(Workspace {
        id: doc.data.id,
        name: doc.data.attributes.name,
    })
}

/// Parses a run document as returned by the run create and read endpoints.
pub fn parse_run(body: &[u8]) -> ApiResult<Run> {
    let doc: Document<RunData> = serde_json::from_slice(body)?;
    let data = doc.data;
    let status = data
        .attributes
        .status
        .ok_or(ApiError::MissingField("run status"))?;

    Ok(Run {
        id: data.id,
        status: status.parse::<RunStatus>().unwrap_or_else(|never| match never {}),
        message: data.attributes.message.unwrap_or_default(),
        plan_id: data
            .relationships
            .plan
            .and_then(|rel| rel.data)
            .map(|plan| plan.id),
    })
}

#[derive(Debug, Serialize)]
struct CreateRunDocument<'a> {
    data: CreateRunData<'a>,
}

#[derive(Debug, Serialize)]
struct CreateRunData<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: CreateRunAttributes<'a>,
    relationships: CreateRunRelationships,
}

#[derive(Debug, Serialize)]
struct CreateRunAttributes<'a> {
    #[serde(rename = "plan-only")]
    plan_only: bool,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRelationships {
    workspace: CreateRunWorkspace,
}

#[derive(Debug, Serialize)]
struct CreateRunWorkspace {
    data: ResourceIdentifier,
}

/// Builds the request body for a plan-only run against `workspace`.
pub fn create_run_body(workspace: &Workspace, message: &str) -> ApiResult<Vec<u8>> {
    let doc = CreateRunDocument {
        data: CreateRunData {
            kind: "runs",
            attributes: CreateRunAttributes {
                plan_only: true,
                message,
            },
            relationships: CreateRunRelationships {
                workspace: CreateRunWorkspace {
                    data: ResourceIdentifier {
                        kind: "workspaces".to_string(),
                        id: workspace.id.clone(),
                    },
                },
            },
        },
    };
    Ok(serde_json::to_vec(&doc)?)
}
