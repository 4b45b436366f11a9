//! The injected verification capability.

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::config::SchemeConfig;

/// Opaque identity value attached to an authorized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Structured claims supplied by the validator.
    Claims(serde_json::Value),
    /// The validator supplied no credentials; the raw token stands in as the
    /// identity marker.
    Token(String),
}

/// Outcome of one validation call.
///
/// A rejection cannot carry credentials: whatever identity a failing
/// validator might have produced is irrelevant to the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The token is valid, optionally with claims describing the identity.
    Accepted(Option<serde_json::Value>),
    /// The token is not valid.
    Rejected,
}

/// Externally supplied token verification.
///
/// The scheme invokes this exactly once per request that presents a token and
/// never retries; retry policy, if any, belongs to the implementation or the
/// client. Implementations must tolerate concurrent invocation — the scheme
/// shares one instance across all in-flight requests.
///
/// ```ignore
/// struct IdpValidator { client: IdpClient }
///
/// #[async_trait]
/// impl TokenValidator for IdpValidator {
///     async fn validate(
///         &self,
///         _request: &Parts,
///         token: &str,
///         _config: Option<&SchemeConfig>,
///     ) -> anyhow::Result<Verdict> {
///         match self.client.introspect(token).await? {
///             Some(claims) => Ok(Verdict::Accepted(Some(claims))),
///             None => Ok(Verdict::Rejected),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Decide whether `token` is valid for `request`.
    ///
    /// `config` is the frozen scheme configuration, handed over only when the
    /// scheme was built with `pass-config` enabled.
    ///
    /// # Errors
    ///
    /// Any error denies the request (fail closed), answered exactly like an
    /// invalid token.
    async fn validate(
        &self,
        request: &Parts,
        token: &str,
        config: Option<&SchemeConfig>,
    ) -> anyhow::Result<Verdict>;
}
