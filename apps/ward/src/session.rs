//! # Session
//!
//! The acting identity, resolved once at startup and passed explicitly to
//! every controller.
//!
//! Resolution order:
//! 1. `identity` from configuration
//! 2. the `email` claim of the bearer token
//! 3. `GET /auth/me`
//!
//! The token claim is read without verifying the signature. That is enough
//! for the client-side guard; the backend re-checks the token on every request.

use crate::client::CaseBackend;
use crate::config::WardConfig;
use crate::error::AppError;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use ward_core::{CaseId, CaseSnapshot, Identity, LifecycleController};

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    email: Option<String>,
}

/// Read the `email` claim from a JWT payload.
///
/// Returns `None` for anything that is not a three-part token with a
/// base64url JSON payload carrying a non-empty `email`.
#[must_use]
pub fn identity_from_token(token: &str) -> Option<Identity> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims
        .email
        .filter(|e| !e.trim().is_empty())
        .map(Identity::new)
}

/// Where the session identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Config,
    Token,
    Backend,
}

/// The acting user for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Identity,
    source: IdentitySource,
}

impl Session {
    #[must_use]
    pub fn new(identity: Identity, source: IdentitySource) -> Self {
        Self { identity, source }
    }

    /// Resolve the identity from configuration, token, or backend, in that order.
    pub async fn resolve<B: CaseBackend>(
        config: &WardConfig,
        backend: &B,
    ) -> Result<Self, AppError> {
        if let Some(identity) = config.identity.as_deref().filter(|i| !i.trim().is_empty()) {
            return Ok(Self::new(Identity::new(identity), IdentitySource::Config));
        }

        if let Some(identity) = config.token.as_deref().and_then(identity_from_token) {
            tracing::debug!(identity = %identity, "identity taken from bearer token");
            return Ok(Self::new(identity, IdentitySource::Token));
        }

        let identity = backend.current_user().await.map_err(|e| {
            AppError::Config(format!(
                "Cannot determine the acting identity (set WARD_IDENTITY or a token): {e}"
            ))
        })?;
        if identity.as_str().trim().is_empty() {
            return Err(AppError::Config(
                "Backend returned an empty identity".to_string(),
            ));
        }
        Ok(Self::new(identity, IdentitySource::Backend))
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn source(&self) -> IdentitySource {
        self.source
    }

    /// A lifecycle controller acting as this session's identity.
    #[must_use]
    pub fn controller_for(&self, snapshot: CaseSnapshot) -> LifecycleController {
        LifecycleController::new(self.identity.clone(), snapshot)
    }

    /// Load a case and wrap it in a controller for this identity.
    pub async fn open_case<B: CaseBackend>(
        &self,
        backend: &B,
        id: &CaseId,
    ) -> Result<LifecycleController, AppError> {
        let snapshot = backend.fetch_case(id).await?;
        Ok(self.controller_for(snapshot))
    }
}

// =============================================================================
// TESTS
// =============================================================================
