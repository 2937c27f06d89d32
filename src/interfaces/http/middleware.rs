use super::AppState;
use crate::config::AllowedOrigins;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use tracing::info;

const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";

/// Value for `access-control-allow-origin`, if the request origin is allowed.
fn allowed_origin(allowed: &AllowedOrigins, headers: &HeaderMap) -> Option<HeaderValue> {
    match allowed {
        AllowedOrigins::Any => Some(HeaderValue::from_static("*")),
        AllowedOrigins::List(origins) => {
            let origin = headers.get("origin")?.to_str().ok()?.trim_end_matches('/');
            origins
                .iter()
                .any(|o| o == origin)
                .then(|| HeaderValue::from_str(origin).ok())
                .flatten()
        }
    }
}

/// `OPTIONS` carrying `access-control-request-method`. Other `OPTIONS` requests reach the router.
fn is_preflight(req: &Request) -> bool {
    req.method() == Method::OPTIONS && req.headers().contains_key("access-control-request-method")
}

pub async fn cors_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let allow_origin = allowed_origin(&state.allowed_origins, req.headers());

    if is_preflight(&req) {
        let requested_headers = req.headers().get("access-control-request-headers").cloned();
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin) = allow_origin {
            let headers = resp.headers_mut();
            headers.insert("access-control-allow-origin", origin);
            headers.insert(
                "access-control-allow-methods",
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                "access-control-allow-headers",
                requested_headers.unwrap_or_else(|| HeaderValue::from_static("*")),
            );
            headers.insert("vary", HeaderValue::from_static("Origin"));
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin) = allow_origin {
        resp.headers_mut()
            .insert("access-control-allow-origin", origin);
        resp.headers_mut()
            .insert("vary", HeaderValue::from_static("Origin"));
    }
    resp
}

pub async fn request_log_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let resp = next.run(req).await;
    info!(
        "{} {} -> {} in {:.1}ms",
        method,
        path,
        resp.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    resp
}
