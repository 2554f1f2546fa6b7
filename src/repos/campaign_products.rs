use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::campaigns::{campaign_columns, campaign_from_row};
use super::products::{product_columns, product_from_row};
use super::RepoResult;
use errors::Error;
use models::*;

const LINK_COLUMNS: &str = "cp.campaign_id, cp.product_id, cp.notes, cp.created_at";
const LINK_COLUMNS_COUNT: usize = 4;

fn link_from_row(row: &Row) -> ::rusqlite::Result<CampaignProduct> {
    Ok(CampaignProduct {
        campaign_id: row.get(0)?,
        product_id: row.get(1)?,
        notes: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub trait CampaignProductsRepo {
    fn get(&self, campaign_id: CampaignId, product_id: ProductId) -> RepoResult<Option<CampaignProduct>>;
    /// Inserts the link or overwrites its notes. `true` when it was created.
    fn upsert(&self, link: &CampaignProduct) -> RepoResult<(bool, CampaignProduct)>;
    fn delete(&self, campaign_id: CampaignId, product_id: ProductId) -> RepoResult<bool>;
    fn list_by_product(&self, product_id: ProductId) -> RepoResult<Vec<CampaignProduct>>;
    fn list_with_products(&self, campaign_id: CampaignId) -> RepoResult<Vec<CampaignProductWithProduct>>;
    fn list_with_campaigns(&self, product_id: ProductId) -> RepoResult<Vec<CampaignProductWithCampaign>>;
}

pub struct CampaignProductsRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> CampaignProductsRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }
}

impl<'a> CampaignProductsRepo for CampaignProductsRepoImpl<'a> {
    fn get(&self, campaign_id: CampaignId, product_id: ProductId) -> RepoResult<Option<CampaignProduct>> {
        let link = self
            .db_conn
            .query_row(
                &format!(
                    "SELECT {} FROM campaign_products cp WHERE cp.campaign_id = ?1 AND cp.product_id = ?2",
                    LINK_COLUMNS
                ),
                params![campaign_id, product_id],
                link_from_row,
            ).optional()
            .with_context(|_| format!("Getting link of product {} to campaign {} failed", product_id, campaign_id))
            .context(Error::Database)?;
        Ok(link)
    }

    fn upsert(&self, link: &CampaignProduct) -> RepoResult<(bool, CampaignProduct)> {
        debug!("Upserting link of product {} to campaign {}", link.product_id, link.campaign_id);
        match self.get(link.campaign_id, link.product_id)? {
            Some(existing) => {
                self.db_conn
                    .execute(
                        "UPDATE campaign_products SET notes = ?3 WHERE campaign_id = ?1 AND product_id = ?2",
                        params![link.campaign_id, link.product_id, link.notes],
                    ).with_context(|_| format!("Updating link of product {} to campaign {} failed", link.product_id, link.campaign_id))
                    .context(Error::Database)?;
                Ok((
                    false,
                    CampaignProduct {
                        notes: link.notes.clone(),
                        ..existing
                    },
                ))
            }
            None => {
                self.db_conn
                    .execute(
                        "INSERT INTO campaign_products (campaign_id, product_id, notes, created_at) VALUES (?1, ?2, ?3, ?4)",
                        params![link.campaign_id, link.product_id, link.notes, link.created_at],
                    ).with_context(|_| format!("Linking product {} to campaign {} failed", link.product_id, link.campaign_id))
                    .context(Error::Database)?;
                Ok((true, link.clone()))
            }
        }
    }

    fn delete(&self, campaign_id: CampaignId, product_id: ProductId) -> RepoResult<bool> {
        debug!("Unlinking product {} from campaign {}", product_id, campaign_id);
        let deleted = self
            .db_conn
            .execute(
                "DELETE FROM campaign_products WHERE campaign_id = ?1 AND product_id = ?2",
                params![campaign_id, product_id],
            ).with_context(|_| format!("Unlinking product {} from campaign {} failed", product_id, campaign_id))
            .context(Error::Database)?;
        Ok(deleted > 0)
    }

    fn list_by_product(&self, product_id: ProductId) -> RepoResult<Vec<CampaignProduct>> {
        let sql = format!(
            "SELECT {} FROM campaign_products cp WHERE cp.product_id = ?1 ORDER BY cp.created_at",
            LINK_COLUMNS
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing campaign links query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![product_id], link_from_row)
            .with_context(|_| format!("Listing campaign links of product {} failed", product_id))
            .context(Error::Database)?;
        let links = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading campaign links failed")
            .context(Error::Database)?;
        Ok(links)
    }

    fn list_with_products(&self, campaign_id: CampaignId) -> RepoResult<Vec<CampaignProductWithProduct>> {
        let sql = format!(
            "SELECT {}, {} FROM campaign_products cp JOIN products p ON p.id = cp.product_id \
             WHERE cp.campaign_id = ?1 ORDER BY cp.created_at",
            LINK_COLUMNS,
            product_columns("p")
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing campaign products query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![campaign_id], |row| {
                Ok(CampaignProductWithProduct {
                    link: link_from_row(row)?,
                    product: product_from_row(row, LINK_COLUMNS_COUNT)?,
                })
            }).with_context(|_| format!("Listing products of campaign {} failed", campaign_id))
            .context(Error::Database)?;
        let links = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading campaign products failed")
            .context(Error::Database)?;
        Ok(links)
    }

    fn list_with_campaigns(&self, product_id: ProductId) -> RepoResult<Vec<CampaignProductWithCampaign>> {
        let sql = format!(
            "SELECT {}, {} FROM campaign_products cp JOIN campaigns c ON c.id = cp.campaign_id \
             WHERE cp.product_id = ?1 ORDER BY c.created_at DESC",
            LINK_COLUMNS,
            campaign_columns("c")
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing product campaigns query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![product_id], |row| {
                Ok(CampaignProductWithCampaign {
                    link: link_from_row(row)?,
                    campaign: campaign_from_row(row, LINK_COLUMNS_COUNT)?,
                })
            }).with_context(|_| format!("Listing campaigns of product {} failed", product_id))
            .context(Error::Database)?;
        let links = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading product campaigns failed")
            .context(Error::Database)?;
        Ok(links)
    }
}
