use chrono::Utc;
use failure::{Error as FailureError, ResultExt};
use rusqlite::{Connection, TransactionBehavior};
use validator::Validate;

use super::products::find_product;
use super::types::ServiceFuture;
use super::Service;
use errors::Error;
use models::date_format::check_period;
use models::*;
use repos::*;

pub trait EventsService {
    /// Chronological, each with its campaigns and products
    fn list_events(&self, terms: EventsSearchTerms) -> ServiceFuture<Vec<EventListItem>>;
    fn create_event(&self, payload: NewEvent) -> ServiceFuture<Event>;
    fn get_event(&self, event_id: EventId) -> ServiceFuture<EventDetails>;
    fn update_event(&self, event_id: EventId, payload: UpdateEvent) -> ServiceFuture<Event>;
    /// Deletes the event with its product links; its campaigns are kept and detached
    fn delete_event(&self, event_id: EventId) -> ServiceFuture<Deleted>;
    /// Links a product to the event or updates the link. `true` when it was created.
    fn link_product_to_event(&self, event_id: EventId, payload: NewEventProduct) -> ServiceFuture<(bool, EventProduct)>;
    fn unlink_product_from_event(&self, event_id: EventId, product_id: ProductId) -> ServiceFuture<Deleted>;
}

pub fn find_event(conn: &Connection, event_id: EventId) -> Result<Event, FailureError> {
    EventsRepoImpl::new(conn)
        .get(event_id)?
        .ok_or_else(|| format_err!("Event {} not found", event_id).context(Error::NotFound).into())
}

impl EventsService for Service {
    fn list_events(&self, terms: EventsSearchTerms) -> ServiceFuture<Vec<EventListItem>> {
        debug!("Listing events with terms {:?}", terms);
        self.spawn_on_pool(move |conn| {
            let events = EventsRepoImpl::new(conn).list(&terms)?;
            let campaigns_repo = CampaignsRepoImpl::new(conn);
            let event_products_repo = EventProductsRepoImpl::new(conn);
            events
                .into_iter()
                .map(|event| {
                    let campaigns = campaigns_repo.list_by_event(event.id)?;
                    let products = event_products_repo.list_with_products(event.id)?;
                    Ok(EventListItem {
                        event,
                        campaigns,
                        products,
                    })
                }).collect::<Result<Vec<_>, FailureError>>()
        })
    }

    fn create_event(&self, payload: NewEvent) -> ServiceFuture<Event> {
        debug!("Creating event {:?}", payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;
            check_period(Some(payload.start_at), payload.end_at).map_err(Error::Validate)?;

            let event = payload.into_event(Utc::now());
            EventsRepoImpl::new(conn).insert(&event)?;
            info!("Created event {} ({})", event.id, event.name);
            Ok(event)
        })
    }

    fn get_event(&self, event_id: EventId) -> ServiceFuture<EventDetails> {
        debug!("Getting event {}", event_id);
        self.spawn_on_pool(move |conn| {
            let event = find_event(conn, event_id)?;
            let campaign_products_repo = CampaignProductsRepoImpl::new(conn);
            let campaigns = CampaignsRepoImpl::new(conn)
                .list_by_event(event_id)?
                .into_iter()
                .map(|campaign| {
                    let products = campaign_products_repo.list_with_products(campaign.id)?;
                    Ok(CampaignWithProducts { campaign, products })
                }).collect::<Result<Vec<_>, FailureError>>()?;
            let products = EventProductsRepoImpl::new(conn).list_with_products(event_id)?;
            Ok(EventDetails {
                event,
                campaigns,
                products,
            })
        })
    }

    fn update_event(&self, event_id: EventId, payload: UpdateEvent) -> ServiceFuture<Event> {
        debug!("Updating event {} with {:?}", event_id, payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting event update failed")
                .context(Error::Database)?;
            let event = {
                let mut event = find_event(&tx, event_id)?;
                payload.apply(&mut event);
                check_period(Some(event.start_at), event.end_at).map_err(Error::Validate)?;
                event.updated_at = Utc::now();
                EventsRepoImpl::new(&tx).update(&event)?;
                event
            };
            tx.commit().context("Committing event update failed").context(Error::Database)?;
            Ok(event)
        })
    }

    fn delete_event(&self, event_id: EventId) -> ServiceFuture<Deleted> {
        debug!("Deleting event {}", event_id);
        self.spawn_on_pool(move |conn| {
            if EventsRepoImpl::new(conn).delete(event_id)? {
                info!("Deleted event {}", event_id);
                Ok(Deleted { success: true })
            } else {
                Err(format_err!("Event {} not found", event_id).context(Error::NotFound).into())
            }
        })
    }

    fn link_product_to_event(&self, event_id: EventId, payload: NewEventProduct) -> ServiceFuture<(bool, EventProduct)> {
        debug!("Linking product {} to event {}", payload.product_id, event_id);
        self.spawn_on_pool(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting event link failed")
                .context(Error::Database)?;
            let res = {
                find_event(&tx, event_id)?;
                find_product(&tx, payload.product_id)?;
                EventProductsRepoImpl::new(&tx).upsert(&payload.into_link(event_id, Utc::now()))?
            };
            tx.commit().context("Committing event link failed").context(Error::Database)?;
            Ok(res)
        })
    }

    fn unlink_product_from_event(&self, event_id: EventId, product_id: ProductId) -> ServiceFuture<Deleted> {
        debug!("Unlinking product {} from event {}", product_id, event_id);
        self.spawn_on_pool(move |conn| {
            if EventProductsRepoImpl::new(conn).delete(event_id, product_id)? {
                Ok(Deleted { success: true })
            } else {
                Err(format_err!("Product {} is not linked to event {}", product_id, event_id)
                    .context(Error::NotFound)
                    .into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::Future;
    use hyper::StatusCode;
    use serde_json;
    use tempfile::TempDir;

    use super::*;
    use http::errors::status_of;
    use services::tests::create_service;
    use services::ProductsService;

    fn event(service: &Service) -> Event {
        let payload: NewEvent = serde_json::from_value(json!({
            "name": "SS27 presentation",
            "type": "PRESENTATION",
            "startAt": "2026-10-01T18:00:00Z",
            "endAt": "2026-10-01T21:00:00Z",
            "location": "Paris",
        })).unwrap();
        service.create_event(payload).wait().unwrap()
    }

    fn product(service: &Service) -> Product {
        let payload: NewProduct = serde_json::from_value(json!({
            "name": "Cardigan",
            "family": "pret-a-porter",
            "season": "SPRING-SUMMER",
            "year": 2027,
            "sizeRange": "S-L",
        })).unwrap();
        service.create_product(payload).wait().unwrap()
    }

    #[test]
    fn event_cannot_end_before_it_starts() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let payload: NewEvent = serde_json::from_value(json!({
            "name": "Backwards",
            "type": "OTHER",
            "startAt": "2026-10-02",
            "endAt": "2026-10-01",
        })).unwrap();
        let e = service.create_event(payload).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::BadRequest);

        let event = event(&service);
        let update: UpdateEvent = serde_json::from_str(r#"{"startAt": "2026-12-01"}"#).unwrap();
        let e = service.update_event(event.id, update).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::BadRequest);
    }

    #[test]
    fn linking_is_an_upsert_and_unlinking_keeps_both_sides() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let event = event(&service);
        let product = product(&service);

        let link = NewEventProduct {
            product_id: product.id,
            notes: None,
            look: Some(3),
        };
        let (created, _) = service.link_product_to_event(event.id, link.clone()).wait().unwrap();
        assert!(created);
        let (created, updated) = service
            .link_product_to_event(
                event.id,
                NewEventProduct {
                    look: Some(7),
                    ..link
                },
            ).wait()
            .unwrap();
        assert!(!created);
        assert_eq!(updated.look, Some(7));

        let details = service.get_event(event.id).wait().unwrap();
        assert_eq!(details.products.len(), 1);
        assert_eq!(details.products[0].product.id, product.id);

        service.unlink_product_from_event(event.id, product.id).wait().unwrap();
        assert!(service.get_event(event.id).wait().unwrap().products.is_empty());
        assert!(service.get_product(product.id).wait().is_ok());

        let e = service.unlink_product_from_event(event.id, product.id).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
    }

    #[test]
    fn linking_needs_both_sides() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let event = event(&service);
        let link = NewEventProduct {
            product_id: ProductId::new(),
            notes: None,
            look: None,
        };
        let e = service.link_product_to_event(event.id, link.clone()).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
        let e = service.link_product_to_event(EventId::new(), link).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
    }
}
