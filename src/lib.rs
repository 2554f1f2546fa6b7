//! Atelier keeps track of a fashion studio's products from sketch to launch: samples and
//! their review, the events products are shown at and the campaigns promoting them.

extern crate chrono;
extern crate config as config_crate;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate futures_cpupool;
extern crate hyper;
#[macro_use]
extern crate log;
extern crate mime;
extern crate mime_guess;
extern crate multipart;
extern crate regex;
#[macro_use]
extern crate rusqlite;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
extern crate serde_urlencoded;
extern crate tokio_core;
extern crate tokio_signal;
extern crate uuid;
extern crate validator;
#[macro_use]
extern crate validator_derive;

#[cfg(test)]
extern crate proptest;
#[cfg(test)]
extern crate tempfile;

pub mod config;
pub mod controller;
pub mod errors;
pub mod http;
pub mod models;
pub mod repos;
pub mod services;
pub mod storage;

use std::sync::Arc;

use failure::{Error as FailureError, ResultExt};
use futures::future;
use futures::prelude::*;
use futures_cpupool::CpuPool;
use hyper::server::Http;
use tokio_core::reactor::Core;

pub use config::Config;
use controller::ControllerImpl;
use http::Application;
use repos::Database;
use services::Service;
use storage::{FileStorage, LocalFileStorage};

/// Wires a `Service` from config: database ready and migrated, cpu pool, local file storage
pub fn create_service(config: Config) -> Result<Service, FailureError> {
    let db = Database::new(config.database_path(), config.busy_timeout());
    db.prepare()?;

    let cpu_pool = CpuPool::new(config.thread_count);
    let storage: Arc<FileStorage> = Arc::new(LocalFileStorage::new(
        &config.storage.uploads_dir,
        &config.storage.public_prefix,
    ));
    Ok(Service::new(config, db, cpu_pool, storage))
}

/// Starts new web service from provided `Config` and serves until Ctrl+C
pub fn start_server(config: Config) -> Result<(), FailureError> {
    // Prepare logger
    env_logger::init();

    let address = config.listen;
    let thread_count = config.thread_count;
    let database_path = config.database.path.clone();

    // Prepare reactor
    let mut core = Core::new().context("Unexpected error creating event loop core")?;
    let handle = Arc::new(core.handle());

    let service = create_service(config)?;
    let app = Application::new(ControllerImpl::new(service));

    let serve = Http::new()
        .serve_addr_handle(&address, &*handle, move || Ok(app.clone()))
        .with_context(|_| format!("Http server initialization on {} failed", address))?;

    let handle_arc2 = handle.clone();
    handle.spawn(
        serve
            .for_each(move |conn| {
                handle_arc2.spawn(conn.map(|_| ()).map_err(|why| error!("Server error: {:?}", why)));
                Ok(())
            }).map_err(|_| ()),
    );

    info!(
        "Listening on http://{}, threads: {}, database: {}",
        address, thread_count, database_path
    );

    core.run(tokio_signal::ctrl_c().flatten_stream().take(1u64).for_each(|()| {
        info!("Ctrl+C received. Exit");
        future::ok(())
    })).context("Server loop failed")?;

    Ok(())
}
