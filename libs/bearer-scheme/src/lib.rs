//! Pluggable bearer-token authorization scheme for Axum.
//!
//! The scheme extracts a bearer token from the `Authorization` header,
//! delegates validation to an injected [`TokenValidator`], and maps the
//! verdict to a continue/deny decision. Token verification itself (JWT
//! signatures, identity-provider round trips) is deliberately out of scope:
//! the caller injects it.
//!
//! - [`SchemeOptions`] / [`SchemeConfig`] — options validated once at
//!   startup, then frozen; invalid configuration is fatal.
//! - [`BearerScheme`] — the per-request handler, safe to share across
//!   concurrent requests.
//! - [`SchemeLayer`] — tower middleware registering the scheme on a router,
//!   with [`AuthCredentials`]/[`AuthArtifacts`] extractors for downstream
//!   handlers.
//!
//! ```ignore
//! let scheme = BearerScheme::new(options, Arc::new(MyValidator))?;
//! let router = router.layer(SchemeLayer::new(scheme));
//! ```

pub mod axum_ext;
pub mod config;
pub mod error;
pub mod scheme;
pub mod validator;

pub use axum_ext::{AuthArtifacts, AuthCredentials, SchemeLayer, SchemeNotApplied, SchemeService};
pub use config::{
    ClientCredentials, KeepAlive, SchemeConfig, SchemeOptions, Strictness, TokenExtraction,
};
pub use error::{AuthError, ConfigError, Violation};
pub use scheme::{BearerScheme, Decision, Grant};
pub use validator::{Credentials, TokenValidator, Verdict};
