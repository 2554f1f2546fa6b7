use chrono::{DateTime, Utc};
use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::RepoResult;
use errors::Error;
use models::*;

const EVENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "event_type",
    "status",
    "start_at",
    "end_at",
    "location",
    "venue",
    "created_at",
    "updated_at",
];

pub fn event_columns(alias: &str) -> String {
    EVENT_COLUMNS
        .iter()
        .map(|column| format!("{}.{}", alias, column))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn event_from_row(row: &Row, offset: usize) -> ::rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        event_type: row.get(offset + 3)?,
        status: row.get(offset + 4)?,
        start_at: row.get(offset + 5)?,
        end_at: row.get(offset + 6)?,
        location: row.get(offset + 7)?,
        venue: row.get(offset + 8)?,
        created_at: row.get(offset + 9)?,
        updated_at: row.get(offset + 10)?,
    })
}

pub trait EventsRepo {
    /// Chronological, filtered by the terms that are set
    fn list(&self, terms: &EventsSearchTerms) -> RepoResult<Vec<Event>>;
    /// Events starting from `now` on that are not cancelled, soonest first
    fn upcoming(&self, now: DateTime<Utc>, limit: u32) -> RepoResult<Vec<Event>>;
    fn get(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn count(&self) -> RepoResult<i64>;
    fn insert(&self, event: &Event) -> RepoResult<()>;
    fn update(&self, event: &Event) -> RepoResult<()>;
    fn delete(&self, id: EventId) -> RepoResult<bool>;
}

pub struct EventsRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> EventsRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }

    fn select(&self, filter: &str) -> String {
        format!("SELECT {} FROM events e {}", event_columns("e"), filter)
    }

    fn query(&self, sql: &str, params: &[&::rusqlite::ToSql]) -> RepoResult<Vec<Event>> {
        let mut stmt = self.db_conn.prepare(sql).context("Preparing events query failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params, |row| event_from_row(row, 0))
            .context("Querying events failed")
            .context(Error::Database)?;
        let events = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading events failed")
            .context(Error::Database)?;
        Ok(events)
    }
}

impl<'a> EventsRepo for EventsRepoImpl<'a> {
    fn list(&self, terms: &EventsSearchTerms) -> RepoResult<Vec<Event>> {
        debug!("Listing events with {:?}", terms);
        let sql = self.select(
            "WHERE (?1 IS NULL OR e.status = ?1) \
             AND (?2 IS NULL OR e.event_type = ?2) \
             ORDER BY e.start_at ASC",
        );
        self.query(&sql, params![terms.status, terms.event_type])
    }

    fn upcoming(&self, now: DateTime<Utc>, limit: u32) -> RepoResult<Vec<Event>> {
        let sql = self.select("WHERE e.start_at >= ?1 AND e.status <> ?2 ORDER BY e.start_at ASC LIMIT ?3");
        self.query(&sql, params![now, EventStatus::Cancelled, limit])
    }

    fn get(&self, id: EventId) -> RepoResult<Option<Event>> {
        let event = self
            .db_conn
            .query_row(&self.select("WHERE e.id = ?1"), params![id], |row| event_from_row(row, 0))
            .optional()
            .with_context(|_| format!("Getting event {} failed", id))
            .context(Error::Database)?;
        Ok(event)
    }

    fn count(&self) -> RepoResult<i64> {
        let count = self
            .db_conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .context("Counting events failed")
            .context(Error::Database)?;
        Ok(count)
    }

    fn insert(&self, event: &Event) -> RepoResult<()> {
        debug!("Inserting event {}", event.id);
        self.db_conn
            .execute(
                &format!(
                    "INSERT INTO events ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    EVENT_COLUMNS.join(", ")
                ),
                params![
                    event.id,
                    event.name,
                    event.description,
                    event.event_type,
                    event.status,
                    event.start_at,
                    event.end_at,
                    event.location,
                    event.venue,
                    event.created_at,
                    event.updated_at,
                ],
            ).with_context(|_| format!("Inserting event {} failed", event.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn update(&self, event: &Event) -> RepoResult<()> {
        debug!("Updating event {}", event.id);
        self.db_conn
            .execute(
                "UPDATE events SET name = ?2, description = ?3, event_type = ?4, status = ?5, start_at = ?6, \
                 end_at = ?7, location = ?8, venue = ?9, updated_at = ?10 \
                 WHERE id = ?1",
                params![
                    event.id,
                    event.name,
                    event.description,
                    event.event_type,
                    event.status,
                    event.start_at,
                    event.end_at,
                    event.location,
                    event.venue,
                    event.updated_at,
                ],
            ).with_context(|_| format!("Updating event {} failed", event.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn delete(&self, id: EventId) -> RepoResult<bool> {
        debug!("Deleting event {}", id);
        let deleted = self
            .db_conn
            .execute("DELETE FROM events WHERE id = ?1", params![id])
            .with_context(|_| format!("Deleting event {} failed", id))
            .context(Error::Database)?;
        Ok(deleted > 0)
    }
}
