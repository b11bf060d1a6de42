//! # Ward HTTP Client
//!
//! Wrapper around the Ward REST backend.
//!
//! ## Endpoints
//!
//! - `GET  /cases/{id}` - Full case with timeline
//! - `POST /cases/{id}/transition` - Advance to the next status
//! - `POST /cases/{id}/assign-owner` - Set the decision owner
//! - `GET  /auth/me` - Identity behind the bearer token
//!
//! No timeout or retry policy is layered on top of reqwest's defaults.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use ward_core::{CaseId, CaseSnapshot, Identity, Rejection, TransitionRequest};

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot address case routes.
    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),

    /// Cannot reach the Ward backend.
    #[error("Cannot connect to Ward backend at {0}")]
    ConnectionFailed(String),

    /// The backend answered with a non-2xx status.
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ClientError {
    /// What the lifecycle controller needs to know about this failure.
    ///
    /// Only a server `detail` string is ever shown verbatim; transport and
    /// parse failures fall back to the controller's generic message.
    #[must_use]
    pub fn to_rejection(&self) -> Rejection {
        match self {
            Self::Rejected { status, detail } => Rejection::new(Some(*status), detail.clone()),
            Self::InvalidUrl(_) | Self::ConnectionFailed(_) | Self::ParseError(_) => {
                Rejection::default()
            }
        }
    }
}

/// Extract a human-readable `detail` string from an error body.
///
/// Validation errors carry a structured `detail` (a list); those do not
/// count as a message, and neither does an empty string.
#[must_use]
pub fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// The REST collaborator the controller driver talks to.
pub trait CaseBackend {
    /// `GET /cases/{id}`.
    fn fetch_case(
        &self,
        id: &CaseId,
    ) -> impl Future<Output = Result<CaseSnapshot, ClientError>> + Send;

    /// `POST /cases/{id}/transition`. The response body is not used.
    fn request_transition(
        &self,
        id: &CaseId,
        request: &TransitionRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `POST /cases/{id}/assign-owner`. The response body is not used.
    fn assign_owner(
        &self,
        id: &CaseId,
        owner: &Identity,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `GET /auth/me`.
    fn current_user(&self) -> impl Future<Output = Result<Identity, ClientError>> + Send;
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    email: String,
}

// =============================================================================
// REQWEST CLIENT
// =============================================================================

/// HTTP client that wraps calls to the Ward REST backend.
#[derive(Clone)]
pub struct WardClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    token: Option<String>,
}

impl WardClient {
    /// Create a new client for the backend rooted at `base_url`
    /// (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let parsed =
            reqwest::Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.into()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.into()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed,
            token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so a case id can never escape its route.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request with optional Bearer auth.
    fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut req = self.http.request(method, self.url(segments)?);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Turn any non-2xx status into `ClientError::Rejected`.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail: extract_detail(&body),
        })
    }

    /// Decode a 2xx body. serde_json's error names the offending field or
    /// variant, which reqwest's `json()` would hide behind "error decoding
    /// response body".
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let body = Self::check_status(resp)
            .await?
            .text()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

impl CaseBackend for WardClient {
    async fn fetch_case(&self, id: &CaseId) -> Result<CaseSnapshot, ClientError> {
        let req = self.request(reqwest::Method::GET, &["cases", id.as_str()])?;
        let resp = self.send(req).await?;
        Self::parse_json(resp).await
    }

    async fn request_transition(
        &self,
        id: &CaseId,
        request: &TransitionRequest,
    ) -> Result<(), ClientError> {
        let req = self
            .request(
                reqwest::Method::POST,
                &["cases", id.as_str(), "transition"],
            )?
            .json(request);
        let resp = self.send(req).await?;
        Self::check_status(resp).await.map(drop)
    }

    async fn assign_owner(&self, id: &CaseId, owner: &Identity) -> Result<(), ClientError> {
        let body = serde_json::json!({ "owner_email": owner });
        let req = self
            .request(
                reqwest::Method::POST,
                &["cases", id.as_str(), "assign-owner"],
            )?
            .json(&body);
        let resp = self.send(req).await?;
        Self::check_status(resp).await.map(drop)
    }

    async fn current_user(&self) -> Result<Identity, ClientError> {
        let req = self.request(reqwest::Method::GET, &["auth", "me"])?;
        let resp = self.send(req).await?;
        let me: MeResponse = Self::parse_json(resp).await?;
        Ok(Identity::new(me.email))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        let body = r#"{"detail":"Case was modified concurrently"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Case was modified concurrently")
        );
    }

    #[test]
    fn structured_detail_is_not_a_message() {
        let body = r#"{"detail":[{"loc":["body","next_state"],"msg":"field required"}]}"#;
        assert!(extract_detail(body).is_none());
        assert!(extract_detail("<html>Bad Gateway</html>").is_none());
        assert!(extract_detail("").is_none());
    }

    #[test]
    fn empty_detail_is_not_a_message() {
        assert!(extract_detail(r#"{"detail":""}"#).is_none());

        let err = ClientError::Rejected {
            status: 400,
            detail: extract_detail(r#"{"detail":""}"#),
        };
        assert_eq!(
            err.to_rejection().user_message(ward_core::GENERIC_TRANSITION_FAILURE),
            ward_core::GENERIC_TRANSITION_FAILURE
        );
    }

    #[test]
    fn rejection_carries_status_and_detail() {
        let err = ClientError::Rejected {
            status: 403,
            detail: Some("Only the decision owner can advance the state".into()),
        };
        let rejection = err.to_rejection();
        assert_eq!(rejection.status, Some(403));
        assert_eq!(
            rejection.detail.as_deref(),
            Some("Only the decision owner can advance the state")
        );
    }

    #[test]
    fn transport_failure_has_no_detail() {
        let err = ClientError::ConnectionFailed("http://localhost:8000/api".into());
        assert_eq!(err.to_rejection(), Rejection::default());
    }

    #[test]
    fn urls_are_built_from_segments() {
        let client = WardClient::new("http://localhost:8000/api/", None).expect("client");
        let url = client
            .url(&["cases", "abc/../x", "transition"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/cases/abc%2F..%2Fx/transition"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        assert!(matches!(
            WardClient::new("mailto:ops@x.com", None),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            WardClient::new("not a url", None),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
