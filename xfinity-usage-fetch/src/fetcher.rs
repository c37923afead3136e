//! Main Xfinity usage fetcher.
//!
//! Every fetch logs in from scratch: scrape the `reqId` token, POST the
//! credentials, then read the usage JSON on the same cookie session.
//!
//! Calls must be serial. [`UsageFetcher::refresh`] takes `&mut self`, so a
//! single fetcher cannot run two refreshes at once.

use reqwest::{Response, StatusCode};
use tracing::{Instrument, Span, debug, error, info, info_span};
use xfinity_usage_core::{Credentials, FetchStage, UsageSnapshot};

use crate::endpoints::XfinityEndpoints;
use crate::error::FetchError;
use crate::host::http::HttpSession;
use crate::login::{LoginForm, extract_req_id, is_login_form};
use crate::parser::{extract_snapshot, parse_usage_body};

// ============================================================================
// Fetcher
// ============================================================================

/// Logs in and reads the usage figures, keeping the last good snapshot.
#[derive(Debug)]
pub struct UsageFetcher {
    session: HttpSession,
    credentials: Credentials,
    endpoints: XfinityEndpoints,
    snapshot: Option<UsageSnapshot>,
    span: Span,
}

impl UsageFetcher {
    /// Creates a fetcher for the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP session cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self, FetchError> {
        Self::with_endpoints(credentials, XfinityEndpoints::default())
    }

    /// Creates a fetcher for custom endpoints.
    ///
    /// The session only talks to the hosts named by `endpoints`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if an endpoint URL is invalid or the HTTP
    /// session cannot be built.
    pub fn with_endpoints(
        credentials: Credentials,
        endpoints: XfinityEndpoints,
    ) -> Result<Self, FetchError> {
        let session = HttpSession::new()?.with_allowed_domains(endpoints.domains()?);
        let span = info_span!("xfinity_usage", user = %credentials.username());

        Ok(Self {
            session,
            credentials,
            endpoints,
            snapshot: None,
            span,
        })
    }

    /// Sets the span all fetcher logging is recorded under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Returns the last successful snapshot, if any.
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        self.snapshot.as_ref()
    }

    /// Returns the account username.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Fetches a new snapshot and replaces the stored one.
    ///
    /// Failures are logged and swallowed: the previous snapshot (or none)
    /// stays in place. Returns true if the snapshot was replaced.
    pub async fn refresh(&mut self) -> bool {
        match self.fetch().await {
            Ok(snapshot) => {
                self.span.in_scope(|| {
                    info!(
                        total = snapshot.total_usage,
                        remaining = ?snapshot.remaining_usage,
                        unit = %snapshot.unit,
                        "Usage refreshed"
                    );
                });
                self.snapshot = Some(snapshot);
                true
            }
            Err(e) => {
                self.span.in_scope(|| log_failure(&e));
                false
            }
        }
    }

    /// Runs the full login-and-fetch flow once.
    ///
    /// Does not touch the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first failure: a non-200 status, an unparseable token page
    /// or usage body, bounced credentials, a transport error, or missing
    /// usage fields.
    pub async fn fetch(&self) -> Result<UsageSnapshot, FetchError> {
        self.fetch_inner().instrument(self.span.clone()).await
    }

    async fn fetch_inner(&self) -> Result<UsageSnapshot, FetchError> {
        let req_id = self.fetch_req_id().await?;
        self.login(&req_id).await?;
        let payload = self.fetch_usage_payload().await?;
        extract_snapshot(payload)
    }

    /// Step 1: scrape the login token.
    async fn fetch_req_id(&self) -> Result<String, FetchError> {
        debug!("Finding reqId for login");

        let stage = FetchStage::Token;
        let response = self
            .session
            .get(&self.endpoints.token_url)
            .await
            .map_err(|e| FetchError::transport(stage, e))?;
        let body = read_ok_body(stage, response).await?;

        let req_id = extract_req_id(&body).ok_or_else(|| FetchError::Parse {
            stage,
            detail: "reqId hidden input not found".to_string(),
        })?;

        debug!(req_id = %req_id, "Found reqId");
        Ok(req_id.to_string())
    }

    /// Step 2: post the credentials.
    async fn login(&self, req_id: &str) -> Result<(), FetchError> {
        debug!("Posting to login");

        let stage = FetchStage::Login;
        let form = LoginForm::new(&self.credentials, req_id);
        let response = self
            .session
            .post_form(&self.endpoints.login_url, &form)
            .await
            .map_err(|e| FetchError::transport(stage, e))?;
        let body = read_ok_body(stage, response).await?;

        if is_login_form(&body) {
            return Err(FetchError::AuthenticationFailed(
                "login form returned again; credentials were not accepted".to_string(),
            ));
        }

        debug!("Login accepted");
        Ok(())
    }

    /// Step 3: read the usage JSON.
    async fn fetch_usage_payload(&self) -> Result<serde_json::Value, FetchError> {
        debug!("Fetching internet usage");

        let stage = FetchStage::Usage;
        let response = self
            .session
            .get(&self.endpoints.usage_url)
            .await
            .map_err(|e| FetchError::transport(stage, e))?;
        let body = read_ok_body(stage, response).await?;

        parse_usage_body(&body)
    }
}

/// Rejects anything but HTTP 200 and reads the body.
async fn read_ok_body(stage: FetchStage, response: Response) -> Result<String, FetchError> {
    let status = response.status();
    if status != StatusCode::OK {
        debug!(stage = %stage, status = %status, "Unexpected status");
        return Err(FetchError::Status { stage, status });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::transport(stage, e))
}

fn log_failure(err: &FetchError) {
    let stage = err.stage().map_or("setup", |s| s.as_str());
    match err.status() {
        Some(status) => error!(
            stage,
            kind = err.kind(),
            status = status.as_u16(),
            error = %err,
            "Usage refresh failed"
        ),
        None => error!(stage, kind = err.kind(), error = %err, "Usage refresh failed"),
    }
}

// ============================================================================
// Tests
// ============================================================================
