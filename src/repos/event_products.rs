use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::events::{event_columns, event_from_row};
use super::products::{product_columns, product_from_row};
use super::RepoResult;
use errors::Error;
use models::*;

const LINK_COLUMNS: &str = "ep.event_id, ep.product_id, ep.notes, ep.look, ep.created_at";
const LINK_COLUMNS_COUNT: usize = 5;
const LOOK_ORDER: &str = "ORDER BY ep.look IS NULL, ep.look, ep.created_at";

fn link_from_row(row: &Row) -> ::rusqlite::Result<EventProduct> {
    Ok(EventProduct {
        event_id: row.get(0)?,
        product_id: row.get(1)?,
        notes: row.get(2)?,
        look: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub trait EventProductsRepo {
    fn get(&self, event_id: EventId, product_id: ProductId) -> RepoResult<Option<EventProduct>>;
    /// Inserts the link or overwrites its notes and look. `true` when it was created.
    fn upsert(&self, link: &EventProduct) -> RepoResult<(bool, EventProduct)>;
    fn delete(&self, event_id: EventId, product_id: ProductId) -> RepoResult<bool>;
    /// Products of an event in look order
    fn list_with_products(&self, event_id: EventId) -> RepoResult<Vec<EventProductWithProduct>>;
    /// Events a product is shown at, chronologically
    fn list_with_events(&self, product_id: ProductId) -> RepoResult<Vec<EventProductWithEvent>>;
}

pub struct EventProductsRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> EventProductsRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }
}

impl<'a> EventProductsRepo for EventProductsRepoImpl<'a> {
    fn get(&self, event_id: EventId, product_id: ProductId) -> RepoResult<Option<EventProduct>> {
        let link = self
            .db_conn
            .query_row(
                &format!(
                    "SELECT {} FROM event_products ep WHERE ep.event_id = ?1 AND ep.product_id = ?2",
                    LINK_COLUMNS
                ),
                params![event_id, product_id],
                link_from_row,
            ).optional()
            .with_context(|_| format!("Getting link of product {} to event {} failed", product_id, event_id))
            .context(Error::Database)?;
        Ok(link)
    }

    fn upsert(&self, link: &EventProduct) -> RepoResult<(bool, EventProduct)> {
        debug!("Upserting link of product {} to event {}", link.product_id, link.event_id);
        match self.get(link.event_id, link.product_id)? {
            Some(existing) => {
                self.db_conn
                    .execute(
                        "UPDATE event_products SET notes = ?3, look = ?4 WHERE event_id = ?1 AND product_id = ?2",
                        params![link.event_id, link.product_id, link.notes, link.look],
                    ).with_context(|_| format!("Updating link of product {} to event {} failed", link.product_id, link.event_id))
                    .context(Error::Database)?;
                Ok((
                    false,
                    EventProduct {
                        notes: link.notes.clone(),
                        look: link.look,
                        ..existing
                    },
                ))
            }
            None => {
                self.db_conn
                    .execute(
                        "INSERT INTO event_products (event_id, product_id, notes, look, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![link.event_id, link.product_id, link.notes, link.look, link.created_at],
                    ).with_context(|_| format!("Linking product {} to event {} failed", link.product_id, link.event_id))
                    .context(Error::Database)?;
                Ok((true, link.clone()))
            }
        }
    }

    fn delete(&self, event_id: EventId, product_id: ProductId) -> RepoResult<bool> {
        debug!("Unlinking product {} from event {}", product_id, event_id);
        let deleted = self
            .db_conn
            .execute(
                "DELETE FROM event_products WHERE event_id = ?1 AND product_id = ?2",
                params![event_id, product_id],
            ).with_context(|_| format!("Unlinking product {} from event {} failed", product_id, event_id))
            .context(Error::Database)?;
        Ok(deleted > 0)
    }

    fn list_with_products(&self, event_id: EventId) -> RepoResult<Vec<EventProductWithProduct>> {
        let sql = format!(
            "SELECT {}, {} FROM event_products ep JOIN products p ON p.id = ep.product_id WHERE ep.event_id = ?1 {}",
            LINK_COLUMNS,
            product_columns("p"),
            LOOK_ORDER
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing event products query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![event_id], |row| {
                Ok(EventProductWithProduct {
                    link: link_from_row(row)?,
                    product: product_from_row(row, LINK_COLUMNS_COUNT)?,
                })
            }).with_context(|_| format!("Listing products of event {} failed", event_id))
            .context(Error::Database)?;
        let links = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading event products failed")
            .context(Error::Database)?;
        Ok(links)
    }

    fn list_with_events(&self, product_id: ProductId) -> RepoResult<Vec<EventProductWithEvent>> {
        let sql = format!(
            "SELECT {}, {} FROM event_products ep JOIN events e ON e.id = ep.event_id WHERE ep.product_id = ?1 \
             ORDER BY e.start_at",
            LINK_COLUMNS,
            event_columns("e")
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing product events query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![product_id], |row| {
                Ok(EventProductWithEvent {
                    link: link_from_row(row)?,
                    event: event_from_row(row, LINK_COLUMNS_COUNT)?,
                })
            }).with_context(|_| format!("Listing events of product {} failed", product_id))
            .context(Error::Database)?;
        let links = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading product events failed")
            .context(Error::Database)?;
        Ok(links)
    }
}
