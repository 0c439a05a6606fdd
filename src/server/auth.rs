//! Authentication middleware for the server
//!
//! Validates Bearer tokens on `/api/` requests. Health checks, tracking
//! webhooks and CORS preflight requests pass through untouched.

use axum::{
    body::Body,
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tower::Layer;

/// Authentication layer that validates Bearer tokens
#[derive(Clone)]
pub struct AuthLayer {
    token: Arc<String>,
}

impl AuthLayer {
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            token: self.token.clone(),
        }
    }
}

/// The actual middleware service
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    token: Arc<String>,
}

impl<S> tower::Service<Request> for AuthMiddleware<S>
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let token = self.token.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if req.method() == Method::OPTIONS || !req.uri().path().starts_with("/api/") {
                return inner.call(req).await;
            }

            let authorized = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map_or(false, |provided| provided == token.as_str());

            if authorized {
                return inner.call(req).await;
            }

            let mut response = Response::new(Body::from(
                "Unauthorized: Invalid or missing Bearer token",
            ));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            Ok(response)
        })
    }
}
