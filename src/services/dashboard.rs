use chrono::Utc;

use super::types::ServiceFuture;
use super::Service;
use models::*;
use repos::*;

pub trait DashboardService {
    /// Counts, latest products and the next events that are not cancelled
    fn dashboard(&self) -> ServiceFuture<DashboardSummary>;
}

impl DashboardService for Service {
    fn dashboard(&self) -> ServiceFuture<DashboardSummary> {
        let limit = self.config.dashboard.recent_limit;
        self.spawn_on_pool(move |conn| {
            let products_repo = ProductsRepoImpl::new(conn);
            let events_repo = EventsRepoImpl::new(conn);
            let campaigns_repo = CampaignsRepoImpl::new(conn);

            let counts = DashboardCounts {
                products: products_repo.count(None)?,
                pending_samples: products_repo.count(Some(SampleStatus::Pending))?,
                validated_samples: products_repo.count(Some(SampleStatus::Validated))?,
                not_validated_samples: products_repo.count(Some(SampleStatus::NotValidated))?,
                events: events_repo.count()?,
                campaigns: campaigns_repo.count(None)?,
                active_campaigns: campaigns_repo.count(Some(CampaignStatus::Active))?,
            };
            Ok(DashboardSummary {
                counts,
                recent_products: products_repo.recent(limit)?,
                upcoming_events: events_repo.upcoming(Utc::now(), limit)?,
            })
        })
    }
}
