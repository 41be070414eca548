// crates/backend-lib/src/middleware/mod.rs

//! Cross-cutting middleware: CORS and cache suppression.
//!
//! Both run in front of every auth endpoint; handlers never set these
//! headers themselves. CORS is applied as plain response headers rather
//! than a preflight-intercepting layer so that `OPTIONS` requests still
//! reach their handler and get the `{ok: true}` acknowledgement.

use axum::extract::Request;
use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, ORIGIN,
    PRAGMA,
};
use axum::middleware::Next;
use axum::response::Response;

/// CORS headers for the auth endpoints: echo the caller's origin and allow
/// credentialed requests so session cookies survive cross-origin use
pub async fn cors(request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, GET, DELETE, OPTIONS"),
    );

    response
}

/// Suppress client and proxy caching of auth responses
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn ok() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_no_cache_headers_are_applied() {
        let app = Router::new()
            .route("/", get(ok))
            .layer(axum::middleware::from_fn(no_cache));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(response.headers().get(PRAGMA).unwrap(), "no-cache");
        assert_eq!(response.headers().get(EXPIRES).unwrap(), "0");
    }

    #[tokio::test]
    async fn test_cors_echoes_the_request_origin() {
        let app = Router::new()
            .route("/", get(ok))
            .layer(axum::middleware::from_fn(cors));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/")
                    .header(ORIGIN, "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_falls_back_to_wildcard_without_an_origin() {
        let app = Router::new()
            .route("/", get(ok))
            .layer(axum::middleware::from_fn(cors));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
