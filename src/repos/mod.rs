//! SQL access, one repo per table. Repos borrow a connection, so they work the same on a
//! plain connection and inside a transaction.

pub mod campaign_products;
pub mod campaigns;
pub mod event_products;
pub mod events;
pub mod products;
pub mod samples;
pub mod schema;
pub mod types;

pub use self::campaign_products::*;
pub use self::campaigns::*;
pub use self::event_products::*;
pub use self::events::*;
pub use self::products::*;
pub use self::samples::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use failure::{Error as FailureError, ResultExt};
use rusqlite::Connection;

use errors::Error;

pub type RepoResult<T> = Result<T, FailureError>;

/// Opens configured connections to the studio database
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> RepoResult<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|_| format!("Opening database {} failed", self.path.display()))
            .context(Error::Database)?;
        conn.busy_timeout(self.busy_timeout)
            .context("Setting busy timeout failed")
            .context(Error::Database)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Enabling foreign keys failed")
            .context(Error::Database)?;
        Ok(conn)
    }

    /// Switches the database to WAL and brings its schema up to date
    pub fn prepare(&self) -> RepoResult<()> {
        let mut conn = self.connect()?;
        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .context("Enabling WAL failed")
            .context(Error::Database)?;
        debug!("Database {} journal mode: {}", self.path.display(), journal_mode);
        schema::migrate(&mut conn)
    }
}
