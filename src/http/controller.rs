use std::sync::Arc;

use failure::Error as FailureError;
use futures::prelude::*;
use hyper;
use hyper::server::{Request, Response, Service};
use serde_json;

use super::errors::{status_of, ErrorMessage};
use super::request_util::json_response;

/// Future returned by a controller: a complete response or a failure chain that
/// `Application` turns into a json error.
pub type ControllerFuture = Box<Future<Item = Response, Error = FailureError>>;

pub trait Controller {
    fn call(&self, req: Request) -> ControllerFuture;
}

/// Adapts a `Controller` to hyper's `Service`, logging every request and rendering errors.
pub struct Application<C: Controller + 'static> {
    controller: Arc<C>,
}

impl<C: Controller + 'static> Application<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

impl<C: Controller + 'static> Clone for Application<C> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

pub fn error_response(e: &FailureError) -> Response {
    let status = status_of(e);
    if status.is_server_error() {
        let chain = e.iter_chain().map(|cause| cause.to_string()).collect::<Vec<_>>();
        error!("{}", chain.join(" <- "));
    } else {
        debug!("Request failed with {}: {}", status, e.find_root_cause());
    }

    let message = ErrorMessage::from_failure(e);
    let body = serde_json::to_string(&message).unwrap_or_else(|_| "{}".to_string());
    json_response(status, body)
}

impl<C: Controller + 'static> Service for Application<C> {
    type Request = Request;
    type Response = Response;
    type Error = hyper::Error;
    type Future = Box<Future<Item = Response, Error = hyper::Error>>;

    fn call(&self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_string();
        debug!("Received request {} {}", method, path);

        Box::new(self.controller.call(req).then(move |res| {
            let response = match res {
                Ok(response) => response,
                Err(e) => error_response(&e),
            };
            info!("{} {} {}", method, path, response.status());
            Ok::<_, hyper::Error>(response)
        }))
    }
}
