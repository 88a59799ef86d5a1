// api/client.rs

//! # Terraform Cloud Client
//!
//! Blocking JSON:API client for the Terraform Cloud / Terraform Enterprise run
//! endpoints, implementing [`RunService`].
//!
//! ## Example Usage
//! ```rust
//! use std::time::Duration;
//! use crate::api::client::TfeClient;
//! use crate::api::{RunService, WorkspaceRef};
//!
//! let client = TfeClient::new("https://app.terraform.io", "my-token")?;
//! let ws = client.read_workspace(
//!     &WorkspaceRef { organization: "acme".into(), name: "network-prod".into() },
//!     Duration::from_secs(30),
//! )?;
//! ```

use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use super::types::{create_run_body, parse_run, parse_workspace, Run, Workspace, WorkspaceRef};
use super::RunService;
use crate::app::{APP_NAME, APP_VERSION, MAX_DURATION_SECS};
use crate::error::{ApiError, ApiResult};

const JSON_API: &str = "application/vnd.api+json";

/// Longest per-request timeout handed to the HTTP client.
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(MAX_DURATION_SECS);

/// Authenticated client for the remote run service.
pub struct TfeClient {
    http: Client,
    base: Url,
    token: String,
}

impl TfeClient {
    /// Creates a client for the service at `address` using `token` for every call.
    pub fn new(address: &str, token: &str) -> ApiResult<Self> {
        let base = Url::parse(address.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidAddress(format!("{}: {}", address, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidAddress(address.to_string()));
        }

        let http = Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
            .build()?;

        Ok(Self {
            http,
            base,
            token: token.to_string(),
        })
    }

    /// Builds `{base}/api/v2/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidAddress(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", "v2"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, timeout: Duration) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(ACCEPT, JSON_API)
            .timeout(timeout.min(MAX_REQUEST_TIMEOUT))
    }

    /// Sends a request and returns the body of a successful response.
    fn send(&self, request: RequestBuilder, what: &str) -> ApiResult<Vec<u8>> {
        let response = request.send()?;
        let status = response.status();
        debug!("{} responded with {}", what, status);

        if status.is_success() {
            let body = response.bytes()?.to_vec();
            trace!("{} returned {} bytes", what, body.len());
            return Ok(body);
        }

        let body = response.text().unwrap_or_default();
        Err(status_error(status, what, body))
    }
}

/// Maps a non-success HTTP status to an [`ApiError`].
fn status_error(status: StatusCode, what: &str, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(what.to_string()),
        _ => ApiError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

impl RunService for TfeClient {
    fn read_workspace(&self, workspace: &WorkspaceRef, timeout: Duration) -> ApiResult<Workspace> {
        let url = self.endpoint(&[
            "organizations",
            &workspace.organization,
            "workspaces",
            &workspace.name,
        ])?;
        debug!("GET {}", url);

        let what = format!("workspace {}/{}", workspace.organization, workspace.name);
        let body = self.send(self.authorized(self.http.get(url), timeout), &what)?;
        parse_workspace(&body)
    }

    fn create_plan_only_run(
        &self,
        workspace: &Workspace,
        message: &str,
        timeout: Duration,
    ) -> ApiResult<Run> {
        let url = self.endpoint(&["runs"])?;
        debug!("POST {} (workspace {})", url, workspace.id);

        let request = self
            .authorized(self.http.post(url), timeout)
            .header(CONTENT_TYPE, JSON_API)
            .body(create_run_body(workspace, message)?);
        let body = self.send(request, &format!("run for workspace {}", workspace.name))?;
        parse_run(&body)
    }

    fn read_run(&self, run_id: &str, timeout: Duration) -> ApiResult<Run> {
        let url = self.endpoint(&["runs", run_id])?;
        debug!("GET {}", url);

        let body = self.send(
            self.authorized(self.http.get(url), timeout),
            &format!("run {}", run_id),
        )?;
        parse_run(&body)
    }

    fn read_plan_json(&self, plan_id: &str, timeout: Duration) -> ApiResult<Vec<u8>> {
        let url = self.endpoint(&["plans", plan_id, "json-output"])?;
        debug!("GET {}", url);

        // The service redirects to short-lived archive storage; the bearer token
        // is dropped by the redirect policy when the host changes.
        self.send(
            self.authorized(self.http.get(url), timeout),
            &format!("JSON output of plan {}", plan_id),
        )
    }
}
