use chrono::{DateTime, Utc};
use validator::Validate;

use super::date_format;
use super::deserialize_some;
use super::{CampaignId, CampaignProductWithProduct, Event, EventId};

text_enum!(CampaignType {
    Digital => "DIGITAL",
    Print => "PRINT",
    Ooh => "OOH",
    Social => "SOCIAL",
    Influencer => "INFLUENCER",
    Other => "OTHER",
});

text_enum!(CampaignStatus {
    Draft => "DRAFT",
    Active => "ACTIVE",
    Paused => "PAUSED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Draft
    }
}

pub const DEFAULT_CURRENCY: &str = "EUR";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Marketing campaign, optionally attached to an event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub budget: Option<f64>,
    pub currency: String,
    pub event_id: Option<EventId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    #[validate(length(min = "1", max = "200"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default, deserialize_with = "date_format::deserialize_option")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "date_format::deserialize_option")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[validate(length(min = "3", max = "3"))]
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub event_id: Option<EventId>,
}

impl NewCampaign {
    pub fn into_campaign(self, now: DateTime<Utc>) -> Campaign {
        Campaign {
            id: CampaignId::new(),
            name: self.name,
            description: self.description,
            campaign_type: self.campaign_type,
            status: self.status,
            start_at: self.start_at,
            end_at: self.end_at,
            budget: self.budget,
            currency: self.currency,
            event_id: self.event_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaign {
    #[validate(length(min = "1", max = "200"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub campaign_type: Option<CampaignType>,
    pub status: Option<CampaignStatus>,
    #[serde(default, deserialize_with = "date_format::deserialize_double_option")]
    pub start_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "date_format::deserialize_double_option")]
    pub end_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub budget: Option<Option<f64>>,
    #[validate(length(min = "3", max = "3"))]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub event_id: Option<Option<EventId>>,
}

impl UpdateCampaign {
    /// The event the campaign gets attached to, if the payload attaches one
    pub fn new_event_id(&self) -> Option<EventId> {
        match self.event_id {
            Some(Some(event_id)) => Some(event_id),
            _ => None,
        }
    }

    pub fn apply(self, campaign: &mut Campaign) {
        if let Some(name) = self.name {
            campaign.name = name;
        }
        if let Some(description) = self.description {
            campaign.description = description;
        }
        if let Some(campaign_type) = self.campaign_type {
            campaign.campaign_type = campaign_type;
        }
        if let Some(status) = self.status {
            campaign.status = status;
        }
        if let Some(start_at) = self.start_at {
            campaign.start_at = start_at;
        }
        if let Some(end_at) = self.end_at {
            campaign.end_at = end_at;
        }
        if let Some(budget) = self.budget {
            campaign.budget = budget;
        }
        if let Some(currency) = self.currency {
            campaign.currency = currency;
        }
        if let Some(event_id) = self.event_id {
            campaign.event_id = event_id;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CampaignsSearchTerms {
    pub status: Option<CampaignStatus>,
    #[serde(rename = "type")]
    pub campaign_type: Option<CampaignType>,
}

/// Campaign with its product links, as nested in event details
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWithProducts {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub products: Vec<CampaignProductWithProduct>,
}

/// Campaign page and campaign list row
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetails {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub products: Vec<CampaignProductWithProduct>,
    pub event: Option<Event>,
}
