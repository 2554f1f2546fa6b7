use failure::{Error as FailureError, Fail};
use futures::prelude::*;
use hyper::header::{ContentLength, ContentType, Headers};
use hyper::server::Response;
use hyper::{Body, StatusCode};
use mime::{self, Mime};
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json;
use serde_urlencoded;

use super::controller::ControllerFuture;
use errors::Error;

/// Reads the whole request body into memory
pub fn read_body(body: Body) -> Box<Future<Item = Vec<u8>, Error = FailureError>> {
    Box::new(
        body.concat2()
            .map(|chunk| chunk.to_vec())
            .map_err(|e| FailureError::from(e.context("Reading request body failed").context(Error::Parse))),
    )
}

/// Reads the whole request body, failing with `PayloadTooLarge` as soon as it grows past `limit` bytes
pub fn read_body_limited(body: Body, limit: usize) -> Box<Future<Item = Vec<u8>, Error = FailureError>> {
    Box::new(
        body.map_err(|e| FailureError::from(e.context("Reading request body failed").context(Error::Parse)))
            .fold(Vec::new(), move |mut bytes, chunk| -> Result<Vec<u8>, FailureError> {
                if bytes.len() + chunk.len() > limit {
                    return Err(format_err!("Request body exceeds {} bytes", limit)
                        .context(Error::PayloadTooLarge)
                        .into());
                }
                bytes.extend_from_slice(&chunk);
                Ok(bytes)
            }),
    )
}

/// Reads the request body and deserializes it from json
pub fn parse_body<T>(body: Body) -> Box<Future<Item = T, Error = FailureError>>
where
    T: DeserializeOwned + 'static,
{
    Box::new(read_body(body).and_then(|bytes| {
        serde_json::from_slice::<T>(&bytes)
            .map_err(|e| FailureError::from(e.context("Request body is not a valid json payload").context(Error::Parse)))
    }))
}

/// Deserializes url query into search terms. Missing query means "no filters".
pub fn parse_query<T>(query: Option<&str>) -> Result<T, FailureError>
where
    T: DeserializeOwned,
{
    serde_urlencoded::from_str::<T>(query.unwrap_or("")).map_err(|e| {
        let message = format!("Invalid query string: {:?}", query);
        FailureError::from(e.context(message).context(Error::BadRequest))
    })
}

/// Boundary of a `multipart/form-data` request, if the request is one
pub fn multipart_boundary(headers: &Headers) -> Option<String> {
    headers.get::<ContentType>().and_then(|content_type| {
        let media_type = &content_type.0;
        if media_type.type_() == mime::MULTIPART && media_type.subtype() == mime::FORM_DATA {
            media_type
                .get_param(mime::BOUNDARY)
                .map(|boundary| boundary.as_str().to_string())
        } else {
            None
        }
    })
}

pub fn json_response(status: StatusCode, body: String) -> Response {
    Response::new()
        .with_status(status)
        .with_header(ContentLength(body.len() as u64))
        .with_header(ContentType::json())
        .with_body(body)
}

pub fn html_response(body: String) -> Response {
    Response::new()
        .with_status(StatusCode::Ok)
        .with_header(ContentLength(body.len() as u64))
        .with_header(ContentType::html())
        .with_body(body)
}

pub fn bytes_response(media_type: Mime, bytes: Vec<u8>) -> Response {
    Response::new()
        .with_status(StatusCode::Ok)
        .with_header(ContentLength(bytes.len() as u64))
        .with_header(ContentType(media_type))
        .with_body(bytes)
}

fn serialize<T: Serialize>(status: StatusCode, item: &T) -> Result<Response, FailureError> {
    serde_json::to_string(item)
        .map(|body| json_response(status, body))
        .map_err(|e| FailureError::from(e.context("Serializing response failed")))
}

/// Resolves the future and answers `200 OK` with its item as json
pub fn serialize_future<T, F>(f: F) -> ControllerFuture
where
    T: Serialize + 'static,
    F: IntoFuture<Item = T, Error = FailureError> + 'static,
{
    serialize_future_with_status(StatusCode::Ok, f)
}

pub fn serialize_future_with_status<T, F>(status: StatusCode, f: F) -> ControllerFuture
where
    T: Serialize + 'static,
    F: IntoFuture<Item = T, Error = FailureError> + 'static,
{
    Box::new(f.into_future().and_then(move |item| serialize(status, &item)))
}

/// For create-or-update endpoints: `201 Created` when the flag says a record was created,
/// `200 OK` otherwise.
pub fn serialize_upsert_future<T, F>(f: F) -> ControllerFuture
where
    T: Serialize + 'static,
    F: IntoFuture<Item = (bool, T), Error = FailureError> + 'static,
{
    Box::new(f.into_future().and_then(|(created, item)| {
        let status = if created { StatusCode::Created } else { StatusCode::Ok };
        serialize(status, &item)
    }))
}

pub fn html_future<F>(f: F) -> ControllerFuture
where
    F: IntoFuture<Item = String, Error = FailureError> + 'static,
{
    Box::new(f.into_future().map(html_response))
}

pub fn bytes_future<F>(f: F) -> ControllerFuture
where
    F: IntoFuture<Item = (Mime, Vec<u8>), Error = FailureError> + 'static,
{
    Box::new(f.into_future().map(|(media_type, bytes)| bytes_response(media_type, bytes)))
}
