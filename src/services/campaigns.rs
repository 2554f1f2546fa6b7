use chrono::Utc;
use failure::{Error as FailureError, ResultExt};
use rusqlite::{Connection, TransactionBehavior};
use validator::Validate;

use super::events::find_event;
use super::products::find_product;
use super::types::ServiceFuture;
use super::Service;
use errors::Error;
use models::date_format::check_period;
use models::*;
use repos::*;

pub trait CampaignsService {
    /// Newest first, each with its products and event
    fn list_campaigns(&self, terms: CampaignsSearchTerms) -> ServiceFuture<Vec<CampaignDetails>>;
    fn create_campaign(&self, payload: NewCampaign) -> ServiceFuture<Campaign>;
    fn get_campaign(&self, campaign_id: CampaignId) -> ServiceFuture<CampaignDetails>;
    fn update_campaign(&self, campaign_id: CampaignId, payload: UpdateCampaign) -> ServiceFuture<Campaign>;
    fn delete_campaign(&self, campaign_id: CampaignId) -> ServiceFuture<Deleted>;
    /// Links a product to the campaign or updates the link notes. `true` when it was created.
    fn link_product_to_campaign(&self, campaign_id: CampaignId, payload: NewCampaignProduct) -> ServiceFuture<(bool, CampaignProduct)>;
    fn unlink_product_from_campaign(&self, campaign_id: CampaignId, product_id: ProductId) -> ServiceFuture<Deleted>;
}

pub fn find_campaign(conn: &Connection, campaign_id: CampaignId) -> Result<Campaign, FailureError> {
    CampaignsRepoImpl::new(conn)
        .get(campaign_id)?
        .ok_or_else(|| format_err!("Campaign {} not found", campaign_id).context(Error::NotFound).into())
}

fn campaign_details(conn: &Connection, campaign: Campaign) -> Result<CampaignDetails, FailureError> {
    let products = CampaignProductsRepoImpl::new(conn).list_with_products(campaign.id)?;
    let event = match campaign.event_id {
        Some(event_id) => EventsRepoImpl::new(conn).get(event_id)?,
        None => None,
    };
    Ok(CampaignDetails {
        campaign,
        products,
        event,
    })
}

impl CampaignsService for Service {
    fn list_campaigns(&self, terms: CampaignsSearchTerms) -> ServiceFuture<Vec<CampaignDetails>> {
        debug!("Listing campaigns with terms {:?}", terms);
        self.spawn_on_pool(move |conn| {
            CampaignsRepoImpl::new(conn)
                .list(&terms)?
                .into_iter()
                .map(|campaign| campaign_details(conn, campaign))
                .collect::<Result<Vec<_>, FailureError>>()
        })
    }

    fn create_campaign(&self, payload: NewCampaign) -> ServiceFuture<Campaign> {
        debug!("Creating campaign {:?}", payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;
            check_period(payload.start_at, payload.end_at).map_err(Error::Validate)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting campaign creation failed")
                .context(Error::Database)?;
            let campaign = {
                if let Some(event_id) = payload.event_id {
                    find_event(&tx, event_id)?;
                }
                let campaign = payload.into_campaign(Utc::now());
                CampaignsRepoImpl::new(&tx).insert(&campaign)?;
                campaign
            };
            tx.commit().context("Committing campaign creation failed").context(Error::Database)?;
            info!("Created campaign {} ({})", campaign.id, campaign.name);
            Ok(campaign)
        })
    }

    fn get_campaign(&self, campaign_id: CampaignId) -> ServiceFuture<CampaignDetails> {
        debug!("Getting campaign {}", campaign_id);
        self.spawn_on_pool(move |conn| {
            let campaign = find_campaign(conn, campaign_id)?;
            campaign_details(conn, campaign)
        })
    }

    fn update_campaign(&self, campaign_id: CampaignId, payload: UpdateCampaign) -> ServiceFuture<Campaign> {
        debug!("Updating campaign {} with {:?}", campaign_id, payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting campaign update failed")
                .context(Error::Database)?;
            let campaign = {
                let mut campaign = find_campaign(&tx, campaign_id)?;
                if let Some(event_id) = payload.new_event_id() {
                    find_event(&tx, event_id)?;
                }
                payload.apply(&mut campaign);
                check_period(campaign.start_at, campaign.end_at).map_err(Error::Validate)?;
                campaign.updated_at = Utc::now();
                CampaignsRepoImpl::new(&tx).update(&campaign)?;
                campaign
            };
            tx.commit().context("Committing campaign update failed").context(Error::Database)?;
            Ok(campaign)
        })
    }

    fn delete_campaign(&self, campaign_id: CampaignId) -> ServiceFuture<Deleted> {
        debug!("Deleting campaign {}", campaign_id);
        self.spawn_on_pool(move |conn| {
            if CampaignsRepoImpl::new(conn).delete(campaign_id)? {
                info!("Deleted campaign {}", campaign_id);
                Ok(Deleted { success: true })
            } else {
                Err(format_err!("Campaign {} not found", campaign_id).context(Error::NotFound).into())
            }
        })
    }

    fn link_product_to_campaign(&self, campaign_id: CampaignId, payload: NewCampaignProduct) -> ServiceFuture<(bool, CampaignProduct)> {
        debug!("Linking product {} to campaign {}", payload.product_id, campaign_id);
        self.spawn_on_pool(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting campaign link failed")
                .context(Error::Database)?;
            let res = {
                find_campaign(&tx, campaign_id)?;
                find_product(&tx, payload.product_id)?;
                CampaignProductsRepoImpl::new(&tx).upsert(&payload.into_link(campaign_id, Utc::now()))?
            };
            tx.commit().context("Committing campaign link failed").context(Error::Database)?;
            Ok(res)
        })
    }

    fn unlink_product_from_campaign(&self, campaign_id: CampaignId, product_id: ProductId) -> ServiceFuture<Deleted> {
        debug!("Unlinking product {} from campaign {}", product_id, campaign_id);
        self.spawn_on_pool(move |conn| {
            if CampaignProductsRepoImpl::new(conn).delete(campaign_id, product_id)? {
                Ok(Deleted { success: true })
            } else {
                Err(format_err!("Product {} is not linked to campaign {}", product_id, campaign_id)
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
    use services::{EventsService, ProductsService};

    fn campaign(service: &Service, event_id: Option<EventId>) -> Campaign {
        let payload: NewCampaign = serde_json::from_value(json!({
            "name": "Holiday gifting",
            "type": "INFLUENCER",
            "budget": 15000,
            "eventId": event_id,
        })).unwrap();
        service.create_campaign(payload).wait().unwrap()
    }

    #[test]
    fn campaign_needs_an_existing_event() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let payload: NewCampaign = serde_json::from_value(json!({
            "name": "Orphan",
            "type": "PRINT",
            "eventId": EventId::new(),
        })).unwrap();
        let e = service.create_campaign(payload).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
    }

    #[test]
    fn details_carry_event_and_products() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let event: NewEvent =
            serde_json::from_value(json!({"name": "Launch party", "type": "LAUNCH", "startAt": "2026-11-20"})).unwrap();
        let event = service.create_event(event).wait().unwrap();
        let campaign = campaign(&service, Some(event.id));
        let product: NewProduct = serde_json::from_value(json!({
            "name": "Signet ring",
            "family": "jewelry",
            "season": "CRUISE",
            "year": 2026,
            "sizeRange": "50-60",
        })).unwrap();
        let product = service.create_product(product).wait().unwrap();

        let link = NewCampaignProduct {
            product_id: product.id,
            notes: Some("hero piece".to_string()),
        };
        let (created, _) = service.link_product_to_campaign(campaign.id, link).wait().unwrap();
        assert!(created);

        let details = service.get_campaign(campaign.id).wait().unwrap();
        assert_eq!(details.event.map(|e| e.id), Some(event.id));
        assert_eq!(details.products.len(), 1);
        assert_eq!(details.products[0].link.notes, Some("hero piece".to_string()));

        let product_details = service.get_product(product.id).wait().unwrap();
        assert_eq!(product_details.campaigns[0].campaign.id, campaign.id);

        service.unlink_product_from_campaign(campaign.id, product.id).wait().unwrap();
        assert!(service.get_campaign(campaign.id).wait().unwrap().products.is_empty());
        assert!(service.get_product(product.id).wait().is_ok());
    }

    #[test]
    fn deleting_the_event_detaches_the_campaign() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let event: NewEvent =
            serde_json::from_value(json!({"name": "Press day", "type": "PRESS", "startAt": "2026-11-20"})).unwrap();
        let event = service.create_event(event).wait().unwrap();
        let campaign = campaign(&service, Some(event.id));

        service.delete_event(event.id).wait().unwrap();
        let details = service.get_campaign(campaign.id).wait().unwrap();
        assert_eq!(details.campaign.event_id, None);
        assert!(details.event.is_none());
    }
}
