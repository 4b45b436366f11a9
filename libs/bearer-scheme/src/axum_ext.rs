//! Axum/tower integration: the scheme middleware and request extractors.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::scheme::{BearerScheme, Decision};
use crate::validator::Credentials;

/// Identity attached to the request by the scheme middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCredentials(pub Credentials);

impl<S> FromRequestParts<S> for AuthCredentials
where
    S: Send + Sync,
{
    type Rejection = SchemeNotApplied;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(SchemeNotApplied)
    }
}

/// Auxiliary data attached alongside [`AuthCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthArtifacts(pub Credentials);

impl<S> FromRequestParts<S> for AuthArtifacts
where
    S: Send + Sync,
{
    type Rejection = SchemeNotApplied;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(SchemeNotApplied)
    }
}

/// Rejection for [`AuthCredentials`]/[`AuthArtifacts`] on routes the scheme
/// middleware never ran for. A wiring error, not a client error.
#[derive(Debug, Clone, Copy)]
pub struct SchemeNotApplied;

impl IntoResponse for SchemeNotApplied {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "authorization scheme middleware not applied to this route",
        )
            .into_response()
    }
}

/// Layer registering a [`BearerScheme`] on a router.
///
/// ```ignore
/// router = router.layer(SchemeLayer::new(scheme));
/// ```
#[derive(Clone)]
pub struct SchemeLayer {
    scheme: BearerScheme,
}

impl SchemeLayer {
    #[must_use]
    pub fn new(scheme: BearerScheme) -> Self {
        Self { scheme }
    }
}

impl<S> Layer<S> for SchemeLayer {
    type Service = SchemeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SchemeService {
            inner,
            scheme: self.scheme.clone(),
        }
    }
}

/// Service produced by [`SchemeLayer`].
///
/// On `Deny` the 401 is returned and the inner service never runs; on
/// `Continue` credentials and artifacts land in the request extensions and,
/// when keep-alive is enabled, the raw token is appended to the response as
/// a `Set-Cookie` header.
#[derive(Clone)]
pub struct SchemeService<S> {
    inner: S,
    scheme: BearerScheme,
}

impl<S> Service<Request<Body>> for SchemeService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let scheme = self.scheme.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();

            match scheme.authorize(&parts).await {
                Decision::Deny(err) => Ok(err.into_response()),
                Decision::Continue(grant) => {
                    parts.extensions.insert(AuthCredentials(grant.credentials));
                    parts.extensions.insert(AuthArtifacts(grant.artifacts));

                    let request = Request::from_parts(parts, body);
                    let mut response = ready_inner.call(request).await?;

                    if let Some(cookie) = scheme.keep_alive_cookie(&grant.token) {
                        response.headers_mut().append(header::SET_COOKIE, cookie);
                    }
                    Ok(response)
                }
            }
        })
    }
}
