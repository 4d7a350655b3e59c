//! XMLHttpRequest header guard.
//!
//! The dashboard stat counters are meant to be polled by the dashboard's own
//! scripts, not opened directly. The guard checks the `X-Requested-With`
//! header the scripts send; it is a politeness fence, not a security
//! boundary, since any client can set the header.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Header value sent by XHR-style clients.
const XHR_VALUE: &str = "XMLHttpRequest";

/// Extractor that requires the `X-Requested-With: XMLHttpRequest` header.
pub struct RequireXhr;

/// Rejection for [`RequireXhr`].
pub struct XhrRejection;

impl IntoResponse for XhrRejection {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireXhr
where
    S: Send + Sync,
{
    type Rejection = XhrRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_xhr = parts
            .headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == XHR_VALUE);

        if is_xhr { Ok(Self) } else { Err(XhrRejection) }
    }
}
