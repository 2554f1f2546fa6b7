use super::{Event, Product};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub products: i64,
    pub pending_samples: i64,
    pub validated_samples: i64,
    pub not_validated_samples: i64,
    pub events: i64,
    pub campaigns: i64,
    pub active_campaigns: i64,
}

/// Home page of the studio
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub counts: DashboardCounts,
    pub recent_products: Vec<Product>,
    pub upcoming_events: Vec<Event>,
}
