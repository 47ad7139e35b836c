use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::{routes::WaitlistError, types::FieldViolation};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("request body could not be read as a waitlist entry: {0}")]
    InvalidBody(String),

    #[error("method {0} is not allowed on this route")]
    MethodNotAllowed(Method),

    #[error("waitlist error: {0}")]
    Waitlist(#[from] WaitlistError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                ClientError::InvalidInput(vec![FieldViolation {
                    field: "body".to_string(),
                    message: reason.clone(),
                }]),
            ),
            Error::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                ClientError::MethodNotAllowed(method.clone()),
            ),
            Error::Waitlist(waitlist_er) => waitlist_er.status_code_and_client_error(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see of an `Error`.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid input")]
    InvalidInput(Vec<FieldViolation>),
    #[display("Email already registered")]
    AlreadyRegistered,
    #[display("Method {_0} Not Allowed")]
    MethodNotAllowed(Method),
    #[display("{message}")]
    ServiceError {
        message: &'static str,
        detail: String,
    },
}

impl ClientError {
    /// Builds the JSON body of the error response.
    /// Internal details of a `ServiceError` only leave the server if `expose_details` is set.
    pub fn to_body(&self, req_id: &str, expose_details: bool) -> Value {
        match self {
            ClientError::InvalidInput(violations) => json!({
                "error": self.to_string(),
                "details": violations,
                "requestId": req_id,
            }),
            ClientError::AlreadyRegistered | ClientError::MethodNotAllowed(_) => json!({
                "error": self.to_string(),
                "requestId": req_id,
            }),
            ClientError::ServiceError { detail, .. } => {
                let detail = if expose_details {
                    detail.as_str()
                } else {
                    "Please try again later"
                };
                json!({
                    "error": self.to_string(),
                    "details": detail,
                    "requestId": req_id,
                })
            }
        }
    }
}
