use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method, Uri,
    },
    response::Response,
};
use uuid::Uuid;

use crate::{
    web::{log, Error, REQUEST_ID_HEADER},
    AppState,
};

/// Turns an `Error` stashed in the response extensions into the JSON error body the client sees.
///
/// The headers of the original response are kept, so CORS and request id headers set by inner
/// layers survive the rewrite.
pub async fn response_mapper(
    State(app_state): State<AppState>,
    req_method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = req_headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().cloned();
    let client_status_and_error = web_error
        .as_deref()
        .map(Error::status_code_and_client_error);

    log::log_request(
        &req_id,
        &req_method,
        &uri,
        resp.status(),
        web_error.as_deref(),
        client_status_and_error.as_ref(),
    );

    let Some((status, client_error)) = client_status_and_error else {
        return resp;
    };

    let body = client_error.to_body(&req_id, app_state.environment.exposes_error_details());

    let (mut parts, _body) = resp.into_parts();
    parts.status = status;
    parts.headers.remove(CONTENT_LENGTH);
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, Body::from(body.to_string()))
}
