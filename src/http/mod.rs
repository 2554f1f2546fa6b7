//! Server side of the hyper stack: the `Controller` abstraction, a regex route
//! parser, body/query helpers and the mapping from `failure` chains to JSON error
//! responses.

pub mod controller;
pub mod errors;
pub mod request_util;
pub mod router;

pub use self::controller::{Application, Controller, ControllerFuture};
pub use self::router::RouteParser;
