use regex;

use http::RouteParser;
use models::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Healthcheck,
    Dashboard,
    Products,
    Product(ProductId),
    ProductSample(ProductId),
    ProductLaunch(ProductId),
    ProductReport(ProductId),
    Events,
    Event(EventId),
    EventProducts(EventId),
    EventProduct(EventId, ProductId),
    Campaigns,
    Campaign(CampaignId),
    CampaignProducts(CampaignId),
    CampaignProduct(CampaignId, ProductId),
    Upload,
    /// Path of a stored file below the public prefix
    UploadedFile(String),
}

pub fn create_route_parser(uploads_prefix: &str) -> RouteParser<Route> {
    let mut router = RouteParser::default();

    // Healthcheck
    router.add_route(r"^/healthcheck$", || Route::Healthcheck);

    router.add_route(r"^/dashboard$", || Route::Dashboard);

    // Products
    router.add_route(r"^/products$", || Route::Products);
    router.add_route_with_params(r"^/products/([^/]+)$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::Product)
    });
    router.add_route_with_params(r"^/products/([^/]+)/sample$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::ProductSample)
    });
    router.add_route_with_params(r"^/products/([^/]+)/launch$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::ProductLaunch)
    });
    router.add_route_with_params(r"^/products/([^/]+)/(?:report|pdf)$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::ProductReport)
    });

    // Events
    router.add_route(r"^/events$", || Route::Events);
    router.add_route_with_params(r"^/events/([^/]+)$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::Event)
    });
    router.add_route_with_params(r"^/events/([^/]+)/products$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::EventProducts)
    });
    router.add_route_with_params(r"^/events/([^/]+)/products/([^/]+)$", |params| {
        if let (Some(event_id), Some(product_id)) = (params.get(0), params.get(1)) {
            match (event_id.parse(), product_id.parse()) {
                (Ok(event_id), Ok(product_id)) => Some(Route::EventProduct(event_id, product_id)),
                _ => None,
            }
        } else {
            None
        }
    });

    // Campaigns
    router.add_route(r"^/campaigns$", || Route::Campaigns);
    router.add_route_with_params(r"^/campaigns/([^/]+)$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::Campaign)
    });
    router.add_route_with_params(r"^/campaigns/([^/]+)/products$", |params| {
        params.get(0).and_then(|id| id.parse().ok()).map(Route::CampaignProducts)
    });
    router.add_route_with_params(r"^/campaigns/([^/]+)/products/([^/]+)$", |params| {
        if let (Some(campaign_id), Some(product_id)) = (params.get(0), params.get(1)) {
            match (campaign_id.parse(), product_id.parse()) {
                (Ok(campaign_id), Ok(product_id)) => Some(Route::CampaignProduct(campaign_id, product_id)),
                _ => None,
            }
        } else {
            None
        }
    });

    // Media
    router.add_route(r"^/upload$", || Route::Upload);
    let uploads_pattern = format!(r"^{}/(.+)$", regex::escape(uploads_prefix.trim_end_matches('/')));
    router.add_route_with_params(&uploads_pattern, |params| {
        params.get(0).map(|path| Route::UploadedFile(path.to_string()))
    });

    router
}
