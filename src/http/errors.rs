use failure::{Context, Error as FailureError};
use hyper::StatusCode;
use serde_json;

use errors::Error;

/// Errors that know which http status they map to
pub trait Codeable {
    fn code(&self) -> StatusCode;
}

/// Errors that carry an additional json payload for the client, e.g. validation errors
pub trait PayloadCarrier {
    fn payload(&self) -> Option<serde_json::Value>;
}

/// Body of every error response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorMessage {
    pub code: u16,
    pub description: String,
    pub payload: Option<serde_json::Value>,
}

/// Finds the first `Error` kind in the failure chain, either bare or wrapped in a `Context`.
pub fn error_kind(e: &FailureError) -> Option<&Error> {
    e.iter_chain()
        .filter_map(|cause| {
            if let Some(ctx) = cause.downcast_ref::<Context<Error>>() {
                Some(ctx.get_context())
            } else {
                cause.downcast_ref::<Error>()
            }
        }).next()
}

/// Status code of a failure chain; anything without an `Error` kind is a 500.
pub fn status_of(e: &FailureError) -> StatusCode {
    error_kind(e).map(|k| k.code()).unwrap_or(StatusCode::InternalServerError)
}

impl ErrorMessage {
    pub fn from_failure(e: &FailureError) -> Self {
        let kind = error_kind(e);
        let status = status_of(e);
        let payload = kind.and_then(|k| k.payload());
        // Internals of 5xx failures stay in the logs
        let description = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            e.find_root_cause().to_string()
        };

        ErrorMessage {
            code: status.as_u16(),
            description,
            payload,
        }
    }
}
