pub mod routes;

use std::sync::Arc;

use failure::Error as FailureError;
use futures::future;
use futures::prelude::*;
use hyper::server::Request;
use hyper::Method;

use self::routes::{create_route_parser, Route};
use errors::Error;
use http::request_util::{
    bytes_future, html_future, multipart_boundary, parse_body, parse_query, read_body_limited, serialize_future,
    serialize_future_with_status, serialize_upsert_future,
};
use http::{Controller, ControllerFuture, RouteParser};
use hyper::StatusCode;
use models::*;
use services::*;

pub struct ControllerImpl {
    pub service: Service,
    pub route_parser: Arc<RouteParser<Route>>,
}

impl ControllerImpl {
    pub fn new(service: Service) -> Self {
        let route_parser = Arc::new(create_route_parser(&service.config.storage.public_prefix));
        Self { service, route_parser }
    }
}

impl Controller for ControllerImpl {
    fn call(&self, req: Request) -> ControllerFuture {
        let service = self.service.clone();
        let method = req.method().clone();
        let path = req.path().to_string();
        let query = req.query().map(|q| q.to_string());
        let boundary = multipart_boundary(req.headers());
        let body = req.body();

        match (&method, self.route_parser.test(&path)) {
            (&Method::Get, Some(Route::Healthcheck)) => serialize_future(future::ok::<_, FailureError>("Ok")),

            (&Method::Get, Some(Route::Dashboard)) => serialize_future(service.dashboard()),

            // Products
            (&Method::Get, Some(Route::Products)) => serialize_future(
                parse_query::<ProductsSearchTerms>(query.as_ref().map(|q| q.as_str()))
                    .into_future()
                    .and_then(move |terms| service.list_products(terms)),
            ),
            (&Method::Post, Some(Route::Products)) => serialize_future_with_status(
                StatusCode::Created,
                parse_body::<NewProduct>(body)
                    .map_err(|e| FailureError::from(e.context("Parsing body // POST /products in NewProduct failed!")))
                    .and_then(move |payload| service.create_product(payload)),
            ),
            (&Method::Get, Some(Route::Product(product_id))) => serialize_future(service.get_product(product_id)),
            (&Method::Patch, Some(Route::Product(product_id))) => serialize_future(
                parse_body::<UpdateProduct>(body)
                    .map_err(|e| FailureError::from(e.context("Parsing body // PATCH /products/:id in UpdateProduct failed!")))
                    .and_then(move |payload| service.update_product(product_id, payload)),
            ),
            (&Method::Delete, Some(Route::Product(product_id))) => serialize_future(service.delete_product(product_id)),

            // Sample workflow
            (&Method::Get, Some(Route::ProductSample(product_id))) => serialize_future(service.get_sample(product_id)),
            (&Method::Put, Some(Route::ProductSample(product_id))) => serialize_future(
                parse_body::<UpdateSample>(body)
                    .and_then(move |payload| service.upsert_sample(product_id, payload))
                    .map(|(_, sample)| sample),
            ),
            (&Method::Post, Some(Route::ProductSample(product_id))) => serialize_upsert_future(
                parse_body::<UpdateSample>(body).and_then(move |payload| service.upsert_sample(product_id, payload)),
            ),
            (&Method::Get, Some(Route::ProductLaunch(product_id))) => serialize_future(service.launch_plan(product_id)),
            (&Method::Get, Some(Route::ProductReport(product_id))) => html_future(service.non_validation_report(product_id)),

            // Events
            (&Method::Get, Some(Route::Events)) => serialize_future(
                parse_query::<EventsSearchTerms>(query.as_ref().map(|q| q.as_str()))
                    .into_future()
                    .and_then(move |terms| service.list_events(terms)),
            ),
            (&Method::Post, Some(Route::Events)) => serialize_future_with_status(
                StatusCode::Created,
                parse_body::<NewEvent>(body)
                    .map_err(|e| FailureError::from(e.context("Parsing body // POST /events in NewEvent failed!")))
                    .and_then(move |payload| service.create_event(payload)),
            ),
            (&Method::Get, Some(Route::Event(event_id))) => serialize_future(service.get_event(event_id)),
            (&Method::Patch, Some(Route::Event(event_id))) => serialize_future(
                parse_body::<UpdateEvent>(body).and_then(move |payload| service.update_event(event_id, payload)),
            ),
            (&Method::Delete, Some(Route::Event(event_id))) => serialize_future(service.delete_event(event_id)),
            (&Method::Post, Some(Route::EventProducts(event_id))) => serialize_upsert_future(
                parse_body::<NewEventProduct>(body).and_then(move |payload| service.link_product_to_event(event_id, payload)),
            ),
            (&Method::Delete, Some(Route::EventProducts(event_id))) => serialize_future(
                parse_body::<UnlinkProduct>(body)
                    .and_then(move |payload| service.unlink_product_from_event(event_id, payload.product_id)),
            ),
            (&Method::Delete, Some(Route::EventProduct(event_id, product_id))) => {
                serialize_future(service.unlink_product_from_event(event_id, product_id))
            }

            // Campaigns
            (&Method::Get, Some(Route::Campaigns)) => serialize_future(
                parse_query::<CampaignsSearchTerms>(query.as_ref().map(|q| q.as_str()))
                    .into_future()
                    .and_then(move |terms| service.list_campaigns(terms)),
            ),
            (&Method::Post, Some(Route::Campaigns)) => serialize_future_with_status(
                StatusCode::Created,
                parse_body::<NewCampaign>(body)
                    .map_err(|e| FailureError::from(e.context("Parsing body // POST /campaigns in NewCampaign failed!")))
                    .and_then(move |payload| service.create_campaign(payload)),
            ),
            (&Method::Get, Some(Route::Campaign(campaign_id))) => serialize_future(service.get_campaign(campaign_id)),
            (&Method::Patch, Some(Route::Campaign(campaign_id))) => serialize_future(
                parse_body::<UpdateCampaign>(body).and_then(move |payload| service.update_campaign(campaign_id, payload)),
            ),
            (&Method::Delete, Some(Route::Campaign(campaign_id))) => serialize_future(service.delete_campaign(campaign_id)),
            (&Method::Post, Some(Route::CampaignProducts(campaign_id))) => serialize_upsert_future(
                parse_body::<NewCampaignProduct>(body)
                    .and_then(move |payload| service.link_product_to_campaign(campaign_id, payload)),
            ),
            (&Method::Delete, Some(Route::CampaignProducts(campaign_id))) => serialize_future(
                parse_body::<UnlinkProduct>(body)
                    .and_then(move |payload| service.unlink_product_from_campaign(campaign_id, payload.product_id)),
            ),
            (&Method::Delete, Some(Route::CampaignProduct(campaign_id, product_id))) => {
                serialize_future(service.unlink_product_from_campaign(campaign_id, product_id))
            }

            // Media
            (&Method::Post, Some(Route::Upload)) => match boundary {
                Some(boundary) => {
                    let limit = service.config.storage.max_upload_bytes;
                    serialize_future(read_body_limited(body, limit).and_then(move |bytes| service.upload_file(boundary, bytes)))
                }
                None => Box::new(future::err(
                    format_err!("Upload must be sent as multipart/form-data")
                        .context(Error::BadRequest)
                        .into(),
                )),
            },
            (&Method::Get, Some(Route::UploadedFile(relative_path))) => bytes_future(service.get_upload(relative_path)),

            // Fallback
            (m, _) => Box::new(future::err(
                format_err!("Request to non existing endpoint in atelier service! {:?} {:?}", m, path)
                    .context(Error::NotFound)
                    .into(),
            )),
        }
    }
}
