use chrono::{DateTime, Utc};

use super::{Campaign, CampaignId, Event, EventId, Product, ProductId};

/// Product shown at an event. `look` orders the products of a show.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventProduct {
    pub event_id: EventId,
    pub product_id: ProductId,
    pub notes: Option<String>,
    pub look: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Product promoted by a campaign
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProduct {
    pub campaign_id: CampaignId,
    pub product_id: ProductId,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /events/{id}/products`. Upserting overwrites notes and look.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewEventProduct {
    pub product_id: ProductId,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub look: Option<i32>,
}

impl NewEventProduct {
    pub fn into_link(self, event_id: EventId, now: DateTime<Utc>) -> EventProduct {
        EventProduct {
            event_id,
            product_id: self.product_id,
            notes: self.notes,
            look: self.look,
            created_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaignProduct {
    pub product_id: ProductId,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewCampaignProduct {
    pub fn into_link(self, campaign_id: CampaignId, now: DateTime<Utc>) -> CampaignProduct {
        CampaignProduct {
            campaign_id,
            product_id: self.product_id,
            notes: self.notes,
            created_at: now,
        }
    }
}

/// Body of the unlink endpoints
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkProduct {
    pub product_id: ProductId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventProductWithProduct {
    #[serde(flatten)]
    pub link: EventProduct,
    pub product: Product,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventProductWithEvent {
    #[serde(flatten)]
    pub link: EventProduct,
    pub event: Event,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProductWithProduct {
    #[serde(flatten)]
    pub link: CampaignProduct,
    pub product: Product,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProductWithCampaign {
    #[serde(flatten)]
    pub link: CampaignProduct,
    pub campaign: Campaign,
}
