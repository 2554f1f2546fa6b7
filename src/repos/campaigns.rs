use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::RepoResult;
use errors::Error;
use models::*;

const CAMPAIGN_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "campaign_type",
    "status",
    "start_at",
    "end_at",
    "budget",
    "currency",
    "event_id",
    "created_at",
    "updated_at",
];

pub fn campaign_columns(alias: &str) -> String {
    CAMPAIGN_COLUMNS
        .iter()
        .map(|column| format!("{}.{}", alias, column))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn campaign_from_row(row: &Row, offset: usize) -> ::rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        campaign_type: row.get(offset + 3)?,
        status: row.get(offset + 4)?,
        start_at: row.get(offset + 5)?,
        end_at: row.get(offset + 6)?,
        budget: row.get(offset + 7)?,
        currency: row.get(offset + 8)?,
        event_id: row.get(offset + 9)?,
        created_at: row.get(offset + 10)?,
        updated_at: row.get(offset + 11)?,
    })
}

pub trait CampaignsRepo {
    /// Newest first, filtered by the terms that are set
    fn list(&self, terms: &CampaignsSearchTerms) -> RepoResult<Vec<Campaign>>;
    fn list_by_event(&self, event_id: EventId) -> RepoResult<Vec<Campaign>>;
    /// Campaigns still running or planned that do not promote the product yet
    fn available_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Campaign>>;
    fn get(&self, id: CampaignId) -> RepoResult<Option<Campaign>>;
    fn count(&self, status: Option<CampaignStatus>) -> RepoResult<i64>;
    fn insert(&self, campaign: &Campaign) -> RepoResult<()>;
    fn update(&self, campaign: &Campaign) -> RepoResult<()>;
    fn delete(&self, id: CampaignId) -> RepoResult<bool>;
}

pub struct CampaignsRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> CampaignsRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }

    fn select(&self, filter: &str) -> String {
        format!("SELECT {} FROM campaigns c {}", campaign_columns("c"), filter)
    }

    fn query(&self, sql: &str, params: &[&::rusqlite::ToSql]) -> RepoResult<Vec<Campaign>> {
        let mut stmt = self.db_conn.prepare(sql).context("Preparing campaigns query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params, |row| campaign_from_row(row, 0))
            .context("Querying campaigns failed")
            .context(Error::Database)?;
        let campaigns = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading campaigns failed")
            .context(Error::Database)?;
        Ok(campaigns)
    }
}

impl<'a> CampaignsRepo for CampaignsRepoImpl<'a> {
    fn list(&self, terms: &CampaignsSearchTerms) -> RepoResult<Vec<Campaign>> {
        debug!("Listing campaigns with {:?}", terms);
        let sql = self.select(
            "WHERE (?1 IS NULL OR c.status = ?1) \
             AND (?2 IS NULL OR c.campaign_type = ?2) \
             ORDER BY c.created_at DESC",
        );
        self.query(&sql, params![terms.status, terms.campaign_type])
    }

    fn list_by_event(&self, event_id: EventId) -> RepoResult<Vec<Campaign>> {
        let sql = self.select("WHERE c.event_id = ?1 ORDER BY c.created_at DESC");
        self.query(&sql, params![event_id])
    }

    fn available_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Campaign>> {
        let sql = self.select(
            "WHERE c.status NOT IN (?2, ?3) \
             AND NOT EXISTS (SELECT 1 FROM campaign_products cp WHERE cp.campaign_id = c.id AND cp.product_id = ?1) \
             ORDER BY c.created_at DESC",
        );
        self.query(
            &sql,
            params![product_id, CampaignStatus::Completed, CampaignStatus::Cancelled],
        )
    }

    fn get(&self, id: CampaignId) -> RepoResult<Option<Campaign>> {
        let campaign = self
            .db_conn
            .query_row(&self.select("WHERE c.id = ?1"), params![id], |row| campaign_from_row(row, 0))
            .optional()
            .with_context(|_| format!("Getting campaign {} failed", id))
            .context(Error::Database)?;
        Ok(campaign)
    }

    fn count(&self, status: Option<CampaignStatus>) -> RepoResult<i64> {
        let count = self
            .db_conn
            .query_row(
                "SELECT COUNT(*) FROM campaigns WHERE ?1 IS NULL OR status = ?1",
                params![status],
                |row| row.get(0),
            ).context("Counting campaigns failed")
            .context(Error::Database)?;
        Ok(count)
    }

    fn insert(&self, campaign: &Campaign) -> RepoResult<()> {
        debug!("Inserting campaign {}", campaign.id);
        self.db_conn
            .execute(
                &format!(
                    "INSERT INTO campaigns ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    CAMPAIGN_COLUMNS.join(", ")
                ),
                params![
                    campaign.id,
                    campaign.name,
                    campaign.description,
                    campaign.campaign_type,
                    campaign.status,
                    campaign.start_at,
                    campaign.end_at,
                    campaign.budget,
                    campaign.currency,
                    campaign.event_id,
                    campaign.created_at,
                    campaign.updated_at,
                ],
            ).with_context(|_| format!("Inserting campaign {} failed", campaign.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn update(&self, campaign: &Campaign) -> RepoResult<()> {
        debug!("Updating campaign {}", campaign.id);
        self.db_conn
            .execute(
                "UPDATE campaigns SET name = ?2, description = ?3, campaign_type = ?4, status = ?5, start_at = ?6, \
                 end_at = ?7, budget = ?8, currency = ?9, event_id = ?10, updated_at = ?11 \
                 WHERE id = ?1",
                params![
                    campaign.id,
                    campaign.name,
                    campaign.description,
                    campaign.campaign_type,
                    campaign.status,
                    campaign.start_at,
                    campaign.end_at,
                    campaign.budget,
                    campaign.currency,
                    campaign.event_id,
                    campaign.updated_at,
                ],
            ).with_context(|_| format!("Updating campaign {} failed", campaign.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn delete(&self, id: CampaignId) -> RepoResult<bool> {
        debug!("Deleting campaign {}", id);
        let deleted = self
            .db_conn
            .execute("DELETE FROM campaigns WHERE id = ?1", params![id])
            .with_context(|_| format!("Deleting campaign {} failed", id))
            .context(Error::Database)?;
        Ok(deleted > 0)
    }
}
