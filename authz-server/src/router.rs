//! Hand-rolled HTTP routing for the sidecar's small surface.

use std::sync::Arc;

use authz_types::{
    check::{CheckRequest, ROLES_HEADER, DEFAULT_ROLE},
    error::ApiError,
    methods::system::WriteRoleParams,
};
use futures::future::BoxFuture;
use http::header::CONTENT_TYPE;
use http_body::Limited;
use hyper::{Body, Method};
use serde::Serialize;
use tower::Service;

use crate::{context::AppContext, system};

#[derive(Clone)]
pub struct RouterService {
    ctx: Arc<AppContext>,
}

impl RouterService {
    #[must_use]
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

impl Service<hyper::Request<Limited<Body>>> for RouterService {
    type Response = hyper::Response<Body>;

    type Error = ApiError;

    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<Limited<Body>>) -> Self::Future {
        let ctx = Arc::clone(&self.ctx);
        Box::pin(async move {
            Ok(route(&ctx, req).await.unwrap_or_else(Into::into))
        })
    }
}

#[tracing::instrument(
    skip(ctx, req),
    fields(path = req.uri().path(), method = %req.method())
)]
async fn route(
    ctx: &AppContext,
    req: hyper::Request<Limited<Body>>,
) -> Result<hyper::Response<Body>, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let role_names = caller_role_names(req.headers());

    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map_err(|_| ApiError::bad_request())?;

    match (&method, path.as_str()) {
        (&Method::POST, "/v1/check") => {
            let check_req: CheckRequest =
                serde_json::from_slice(&body).map_err(|_| ApiError::bad_request())?;
            let resp = ctx.handler.check(&check_req).await;
            json_response(&resp)
        }
        (&Method::GET, "/v1/pools") => {
            let resp = system::handle_allowed_pools(ctx, role_names).await?;
            json_response(&resp)
        }
        (&Method::POST, "/v1/sys/roles") => {
            let params: WriteRoleParams =
                serde_json::from_slice(&body).map_err(|_| ApiError::bad_request())?;
            let resp = system::handle_write_role(ctx, params).await?;
            json_response(&resp)
        }
        (&Method::GET, "/v1/sys/roles") => {
            let resp = system::handle_list_roles(ctx).await?;
            json_response(&resp)
        }
        (&Method::GET, "/v1/sys/cache") => json_response(&system::handle_cache_status(ctx)),
        (&Method::DELETE, "/v1/sys/cache") => json_response(&system::handle_clear_cache(ctx)),
        (&Method::GET | &Method::DELETE, _) => {
            let Some(name) = path.strip_prefix("/v1/sys/roles/") else {
                return Err(ApiError::not_found());
            };
            if name.is_empty() || name.contains('/') {
                return Err(ApiError::not_found());
            }
            if method == Method::GET {
                json_response(&system::handle_read_role(ctx, name).await?)
            } else {
                json_response(&system::handle_remove_role(ctx, name).await?)
            }
        }
        _ => Err(ApiError::not_found()),
    }
}

/// The caller's roles header, comma-split and trimmed, with the default role
/// appended — identical treatment to a check request.
fn caller_role_names(headers: &hyper::HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = headers
        .get(ROLES_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect();
    names.push(DEFAULT_ROLE.to_string());
    names
}

fn json_response<T: Serialize>(payload: &T) -> Result<hyper::Response<Body>, ApiError> {
    let body = serde_json::to_vec(payload).map_err(|_| ApiError::internal_error())?;
    hyper::Response::builder()
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .map_err(|_| ApiError::internal_error())
}
