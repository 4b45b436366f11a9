//! Error taxonomy and its HTTP mapping.
//!
//! Two families with very different lifetimes: [`ConfigError`] is raised once
//! at scheme construction and aborts startup; [`AuthError`] is per-request,
//! always caught at the handler boundary and answered with a structured 401.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A single configuration violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// A required option is absent.
    #[error("missing required option `{0}`")]
    Missing(&'static str),
    /// An option is present but empty.
    #[error("option `{0}` must not be empty")]
    Empty(&'static str),
}

/// Invalid scheme configuration.
///
/// Carries every violation found, not just the first. Never converted into a
/// per-request response: a scheme with invalid configuration must not serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid scheme configuration: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// Per-request authorization failure.
///
/// Every variant answers with HTTP 401 and stops the pipeline; the client
/// recovers by resubmitting with a corrected token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token could be extracted from the request.
    #[error("token not found")]
    TokenNotFound,
    /// The validator rejected the token.
    #[error("token is not valid")]
    InvalidToken,
    /// The validator itself failed. Answered exactly like
    /// [`AuthError::InvalidToken`] (fail closed); the fault detail stays in
    /// the logs.
    #[error("token validator fault: {0}")]
    CallbackFault(String),
}

impl AuthError {
    fn detail(&self) -> &'static str {
        match self {
            Self::TokenNotFound => "Token Not Found",
            Self::InvalidToken | Self::CallbackFault(_) => "Token Is Not Valid",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            Self::TokenNotFound => tracing::debug!("authorization rejected: no token presented"),
            Self::InvalidToken => tracing::debug!("authorization rejected: token is not valid"),
            Self::CallbackFault(detail) => tracing::warn!("token validator fault: {detail}"),
        }

        let body = json!({
            "status": StatusCode::UNAUTHORIZED.as_u16(),
            "title": "Unauthorized",
            "detail": self.detail(),
        });

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
