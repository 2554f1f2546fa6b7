use chrono::{DateTime, Utc};
use validator::Validate;

use super::date_format;
use super::deserialize_some;
use super::{Campaign, CampaignWithProducts, EventId, EventProductWithProduct};

text_enum!(EventType {
    Show => "SHOW",
    Presentation => "PRESENTATION",
    Launch => "LAUNCH",
    Press => "PRESS",
    TradeShow => "TRADE-SHOW",
    Other => "OTHER",
});

text_enum!(EventStatus {
    Draft => "DRAFT",
    Confirmed => "CONFIRMED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Draft
    }
}

/// Show, presentation or any other dated occasion products are shown at
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: EventStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = "1", max = "200"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(deserialize_with = "date_format::deserialize")]
    pub start_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "date_format::deserialize_option")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        Event {
            id: EventId::new(),
            name: self.name,
            description: self.description,
            event_type: self.event_type,
            status: self.status,
            start_at: self.start_at,
            end_at: self.end_at,
            location: self.location,
            venue: self.venue,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(length(min = "1", max = "200"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    #[serde(default, deserialize_with = "date_format::deserialize_option")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "date_format::deserialize_double_option")]
    pub end_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub venue: Option<Option<String>>,
}

impl UpdateEvent {
    pub fn apply(self, event: &mut Event) {
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(start_at) = self.start_at {
            event.start_at = start_at;
        }
        if let Some(end_at) = self.end_at {
            event.end_at = end_at;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(venue) = self.venue {
            event.venue = venue;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EventsSearchTerms {
    pub status: Option<EventStatus>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventListItem {
    #[serde(flatten)]
    pub event: Event,
    pub campaigns: Vec<Campaign>,
    pub products: Vec<EventProductWithProduct>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub campaigns: Vec<CampaignWithProducts>,
    pub products: Vec<EventProductWithProduct>,
}
