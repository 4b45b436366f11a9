//! Scheme configuration: raw options, validation, and the frozen config.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{ConfigError, Violation};

/// Context path applied when `context` is not configured.
pub const DEFAULT_CONTEXT: &str = "auth";

/// Cookie name applied when keep-alive is enabled without `keep-alive-cookie`.
pub const DEFAULT_KEEP_ALIVE_COOKIE: &str = "token";

/// How the raw token is recovered from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenExtraction {
    /// The entire header value is the token.
    #[default]
    Direct,
    /// The header is `<scheme> <token>`; the second whitespace-separated
    /// part is the token. A header without a second part is an extraction
    /// fault and the request is denied as if no token were present.
    BearerSplit,
}

/// Which otherwise-optional options are promoted to required.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Strictness {
    pub require_realm: bool,
    pub require_secret: bool,
}

/// Client credentials block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientCredentials {
    pub secret: Option<SecretString>,
}

/// Raw scheme options as accepted from configuration.
///
/// Every field is optional or defaulted so that [`SchemeOptions::validate`]
/// can report all missing required options at once instead of failing on the
/// first one. Wire keys are kebab-case; the camelCase spellings some
/// deployments use (`authServerUrl`, `keepAlive`) are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SchemeOptions {
    /// Identity-provider realm identifier. Required under
    /// `strictness.require-realm`.
    pub realm: Option<String>,

    /// Realm public key used by some verification strategies. Pass-through.
    pub realm_public_key: Option<String>,

    /// Base URL of the identity provider. Always required.
    #[serde(alias = "authServerUrl")]
    pub auth_server_url: Option<String>,

    /// TLS policy hint, passed through unvalidated.
    pub ssl_required: Option<String>,

    /// Client/application identifier.
    pub resource: Option<String>,

    /// Client credentials. The secret is required under
    /// `strictness.require-secret`.
    pub credentials: Option<ClientCredentials>,

    pub public_client: bool,

    /// Defaults to [`DEFAULT_CONTEXT`].
    pub context: Option<String>,

    /// Persist the raw token as a response cookie on success.
    #[serde(alias = "keepAlive")]
    pub keep_alive: bool,

    /// Name of the cookie written when `keep-alive` is enabled. Defaults to
    /// [`DEFAULT_KEEP_ALIVE_COOKIE`].
    #[serde(alias = "keepAliveCookie")]
    pub keep_alive_cookie: Option<String>,

    /// Token extraction policy.
    pub extraction: TokenExtraction,

    /// Hand the frozen [`SchemeConfig`] to the token validator on every call.
    pub pass_config: bool,

    pub strictness: Strictness,
}

impl SchemeOptions {
    /// Validate the options and freeze them into a [`SchemeConfig`].
    ///
    /// All violations are collected before failing, so a single error lists
    /// everything that has to be fixed. No side effects.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] carrying every violation found. Callers must treat it
    /// as fatal: a scheme must not serve with invalid configuration.
    pub fn validate(self) -> Result<SchemeConfig, ConfigError> {
        let mut violations = Vec::new();

        match self.auth_server_url.as_deref() {
            None => violations.push(Violation::Missing("auth-server-url")),
            Some("") => violations.push(Violation::Empty("auth-server-url")),
            Some(_) => {}
        }

        match self.realm.as_deref() {
            None if self.strictness.require_realm => {
                violations.push(Violation::Missing("realm"));
            }
            Some("") => violations.push(Violation::Empty("realm")),
            _ => {}
        }

        let client_secret = self.credentials.and_then(|c| c.secret);
        match client_secret.as_ref() {
            None if self.strictness.require_secret => {
                violations.push(Violation::Missing("credentials.secret"));
            }
            Some(secret) if secret.expose_secret().is_empty() => {
                violations.push(Violation::Empty("credentials.secret"));
            }
            _ => {}
        }

        let context = self
            .context
            .unwrap_or_else(|| DEFAULT_CONTEXT.to_owned());
        if context.is_empty() {
            violations.push(Violation::Empty("context"));
        }

        let keep_alive = if self.keep_alive {
            let cookie = self
                .keep_alive_cookie
                .unwrap_or_else(|| DEFAULT_KEEP_ALIVE_COOKIE.to_owned());
            if cookie.is_empty() {
                violations.push(Violation::Empty("keep-alive-cookie"));
            }
            Some(KeepAlive { cookie })
        } else {
            None
        };

        if !violations.is_empty() {
            return Err(ConfigError { violations });
        }

        Ok(SchemeConfig {
            realm: self.realm,
            realm_public_key: self.realm_public_key,
            auth_server_url: self.auth_server_url.unwrap_or_default(),
            ssl_required: self.ssl_required,
            resource: self.resource,
            client_secret,
            public_client: self.public_client,
            context,
            keep_alive,
            extraction: self.extraction,
            pass_config: self.pass_config,
        })
    }
}

/// Keep-alive persistence settings. Present iff keep-alive is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAlive {
    /// Name of the response cookie that receives the raw token.
    pub cookie: String,
}

/// Frozen scheme configuration.
///
/// Built once by [`SchemeOptions::validate`] with defaults applied, then
/// shared read-only for the lifetime of the scheme. Never mutated.
#[derive(Debug, Clone)]
pub struct SchemeConfig {
    pub realm: Option<String>,
    pub realm_public_key: Option<String>,
    pub auth_server_url: String,
    pub ssl_required: Option<String>,
    pub resource: Option<String>,
    pub client_secret: Option<SecretString>,
    pub public_client: bool,
    pub context: String,
    pub keep_alive: Option<KeepAlive>,
    pub extraction: TokenExtraction,
    pub pass_config: bool,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn minimal() -> SchemeOptions {
        SchemeOptions {
            auth_server_url: Some("https://id.example.com".to_owned()),
            ..SchemeOptions::default()
        }
    }

    #[test]
    fn missing_auth_server_url_is_a_violation() {
        let err = SchemeOptions::default().validate().unwrap_err();
        assert_eq!(err.violations, vec![Violation::Missing("auth-server-url")]);
    }

    #[test]
    fn empty_auth_server_url_is_a_violation() {
        let err = SchemeOptions {
            auth_server_url: Some(String::new()),
            ..SchemeOptions::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.violations, vec![Violation::Empty("auth-server-url")]);
    }

    #[test]
    fn all_violations_are_reported_at_once() {
        let err = SchemeOptions {
            strictness: Strictness {
                require_realm: true,
                require_secret: true,
            },
            ..SchemeOptions::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                Violation::Missing("auth-server-url"),
                Violation::Missing("realm"),
                Violation::Missing("credentials.secret"),
            ]
        );
    }

    #[test]
    fn realm_is_optional_unless_strictness_requires_it() {
        let config = minimal().validate().unwrap();
        assert_eq!(config.realm, None);

        let err = SchemeOptions {
            strictness: Strictness {
                require_realm: true,
                require_secret: false,
            },
            ..minimal()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.violations, vec![Violation::Missing("realm")]);
    }

    #[test]
    fn secret_required_only_in_strict_mode() {
        let err = SchemeOptions {
            strictness: Strictness {
                require_realm: false,
                require_secret: true,
            },
            ..minimal()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.violations, vec![Violation::Missing("credentials.secret")]);

        let config = SchemeOptions {
            strictness: Strictness {
                require_realm: false,
                require_secret: true,
            },
            credentials: Some(ClientCredentials {
                secret: Some("s3cr3t".into()),
            }),
            ..minimal()
        }
        .validate()
        .unwrap();
        assert!(config.client_secret.is_some());
    }

    #[test]
    fn defaults_are_applied() {
        let config = minimal().validate().unwrap();

        assert_eq!(config.context, "auth");
        assert_eq!(config.keep_alive, None);
        assert_eq!(config.extraction, TokenExtraction::Direct);
        assert!(!config.public_client);
        assert!(!config.pass_config);
    }

    #[test]
    fn keep_alive_gets_the_default_cookie_name() {
        let config = SchemeOptions {
            keep_alive: true,
            ..minimal()
        }
        .validate()
        .unwrap();

        assert_eq!(
            config.keep_alive,
            Some(KeepAlive {
                cookie: "token".to_owned()
            })
        );
    }

    #[test]
    fn empty_keep_alive_cookie_is_a_violation() {
        let err = SchemeOptions {
            keep_alive: true,
            keep_alive_cookie: Some(String::new()),
            ..minimal()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.violations, vec![Violation::Empty("keep-alive-cookie")]);
    }

    #[test]
    fn cookie_name_is_ignored_when_keep_alive_is_off() {
        let config = SchemeOptions {
            keep_alive_cookie: Some("session".to_owned()),
            ..minimal()
        }
        .validate()
        .unwrap();
        assert_eq!(config.keep_alive, None);
    }

    #[test]
    fn kebab_case_keys_deserialize() {
        let options: SchemeOptions = serde_json::from_value(json!({
            "realm": "main",
            "realm-public-key": "PEM",
            "auth-server-url": "https://id.example.com",
            "ssl-required": "external",
            "resource": "my-app",
            "credentials": { "secret": "s3cr3t" },
            "public-client": true,
            "context": "sso",
            "keep-alive": true,
            "keep-alive-cookie": "session",
            "extraction": "bearer-split",
            "pass-config": true,
            "strictness": { "require-realm": true }
        }))
        .unwrap();

        let config = options.validate().unwrap();
        assert_eq!(config.realm.as_deref(), Some("main"));
        assert_eq!(config.auth_server_url, "https://id.example.com");
        assert_eq!(config.context, "sso");
        assert_eq!(config.extraction, TokenExtraction::BearerSplit);
        assert!(config.pass_config);
        assert!(config.public_client);
        assert_eq!(
            config.keep_alive,
            Some(KeepAlive {
                cookie: "session".to_owned()
            })
        );
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let options: SchemeOptions = serde_json::from_value(json!({
            "authServerUrl": "https://id.example.com",
            "keepAlive": true
        }))
        .unwrap();

        let config = options.validate().unwrap();
        assert_eq!(config.auth_server_url, "https://id.example.com");
        assert!(config.keep_alive.is_some());
    }

    #[test]
    fn unknown_keys_are_rejected_at_deserialization() {
        let result: Result<SchemeOptions, _> = serde_json::from_value(json!({
            "auth-server-url": "https://id.example.com",
            "bearer-only": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn wrong_typed_fields_are_rejected_at_deserialization() {
        let result: Result<SchemeOptions, _> = serde_json::from_value(json!({
            "auth-server-url": 42
        }));
        assert!(result.is_err());
    }
}
