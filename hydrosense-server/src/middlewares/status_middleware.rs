use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use hydrosense_api::restful::ResponseStatus;

pub static X_STATUS: HeaderName = HeaderName::from_static("x-status");

/// Classifies every response as `success` or `failure` for clients that
/// only look at headers.
pub async fn status_header(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;

    let status = if response.status().is_success() {
        ResponseStatus::Success
    } else {
        ResponseStatus::Failure
    };

    response
        .headers_mut()
        .insert(X_STATUS.clone(), HeaderValue::from_static(status.as_str()));

    response
}
