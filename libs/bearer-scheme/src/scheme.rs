//! The per-request authorization handler.
//!
//! Linear state machine per request, no retries:
//! extract token -> await the validator once -> continue or deny.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header, request::Parts};

use crate::config::{SchemeConfig, SchemeOptions, TokenExtraction};
use crate::error::{AuthError, ConfigError};
use crate::validator::{Credentials, TokenValidator, Verdict};

/// Outcome of one authorization pass. Terminal either way; a denied request
/// must be resubmitted by the client with a corrected token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request continue with the attached grant.
    Continue(Grant),
    /// Stop the pipeline with a 401.
    Deny(AuthError),
}

/// What an authorized request carries downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Identity attached to the request.
    pub credentials: Credentials,
    /// Auxiliary data exposed alongside the credentials. Mirrors
    /// `credentials`: both fall back to the raw token when the validator
    /// supplies no claims.
    pub artifacts: Credentials,
    /// The raw token as presented, kept for keep-alive persistence.
    pub token: String,
}

/// Bearer-token authorization scheme.
///
/// Immutable: closes over its validated configuration and the injected
/// validator, shares both by `Arc`, and holds no per-request state, so one
/// instance serves any number of concurrent requests.
#[derive(Clone)]
pub struct BearerScheme {
    config: Arc<SchemeConfig>,
    validator: Arc<dyn TokenValidator>,
}

impl BearerScheme {
    /// Validate `options` once and build the scheme.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] listing every violation. Fatal: the caller must not
    /// start serving with this scheme.
    pub fn new(
        options: SchemeOptions,
        validator: Arc<dyn TokenValidator>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Arc::new(options.validate()?),
            validator,
        })
    }

    /// The frozen configuration this scheme serves with.
    #[must_use]
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Decide whether one request may continue.
    ///
    /// The only suspension point is the awaited validator call; nothing here
    /// blocks the runtime or shares mutable state across requests. Any
    /// ambiguity (missing token, validator fault, rejection) denies.
    pub async fn authorize(&self, request: &Parts) -> Decision {
        let Some(token) = extract_token(&request.headers, self.config.extraction) else {
            return Decision::Deny(AuthError::TokenNotFound);
        };
        let token = token.to_owned();

        let config = self.config.pass_config.then(|| self.config.as_ref());
        let verdict = match self.validator.validate(request, &token, config).await {
            Ok(verdict) => verdict,
            Err(fault) => return Decision::Deny(AuthError::CallbackFault(fault.to_string())),
        };

        match verdict {
            Verdict::Accepted(claims) => {
                let credentials = match claims {
                    Some(claims) => Credentials::Claims(claims),
                    None => Credentials::Token(token.clone()),
                };
                Decision::Continue(Grant {
                    artifacts: credentials.clone(),
                    credentials,
                    token,
                })
            }
            Verdict::Rejected => Decision::Deny(AuthError::InvalidToken),
        }
    }

    /// `Set-Cookie` value persisting the raw token, when keep-alive is on.
    ///
    /// A token that is not a legal cookie value is logged and skipped; the
    /// request itself is not failed over it.
    pub(crate) fn keep_alive_cookie(&self, token: &str) -> Option<HeaderValue> {
        let keep_alive = self.config.keep_alive.as_ref()?;
        match HeaderValue::from_str(&format!("{}={token}; Path=/", keep_alive.cookie)) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("keep-alive skipped: token is not a valid cookie value");
                None
            }
        }
    }
}

/// Case-insensitive `Authorization` lookup plus the configured extraction
/// policy. `None` means no token could be recovered.
fn extract_token(headers: &HeaderMap, policy: TokenExtraction) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    match policy {
        TokenExtraction::Direct => (!value.is_empty()).then_some(value),
        TokenExtraction::BearerSplit => value.split_whitespace().nth(1),
    }
}
