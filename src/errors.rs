use hyper::StatusCode;
use serde_json;
use validator::ValidationErrors;

use http::errors::{Codeable, PayloadCarrier};

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Parse error")]
    Parse,
    #[fail(display = "Bad request")]
    BadRequest,
    #[fail(display = "Payload too large")]
    PayloadTooLarge,
    #[fail(display = "Validation error")]
    Validate(ValidationErrors),
    #[fail(display = "Sample workflow violation")]
    Workflow,
    #[fail(display = "Database error")]
    Database,
    #[fail(display = "File storage error")]
    Storage,
}

impl Codeable for Error {
    fn code(&self) -> StatusCode {
        match *self {
            Error::NotFound => StatusCode::NotFound,
            Error::BadRequest | Error::Validate(_) => StatusCode::BadRequest,
            Error::Parse => StatusCode::UnprocessableEntity,
            Error::PayloadTooLarge => StatusCode::PayloadTooLarge,
            Error::Workflow => StatusCode::Conflict,
            Error::Database | Error::Storage => StatusCode::InternalServerError,
        }
    }
}

impl PayloadCarrier for Error {
    fn payload(&self) -> Option<serde_json::Value> {
        match *self {
            Error::Validate(ref e) => serde_json::to_value(e.clone()).ok(),
            _ => None,
        }
    }
}
