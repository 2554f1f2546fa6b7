use failure::ResultExt;
use rusqlite::Connection;

use super::RepoResult;
use errors::Error;

/// Each entry brings the schema one `user_version` further
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE products (
        id                TEXT PRIMARY KEY,
        name              TEXT NOT NULL,
        sku               TEXT NOT NULL UNIQUE,
        family            TEXT NOT NULL,
        season            TEXT NOT NULL,
        year              INTEGER NOT NULL,
        size_range        TEXT NOT NULL,
        sizes             TEXT NOT NULL DEFAULT '[]',
        measurements      TEXT,
        materials         TEXT NOT NULL DEFAULT '[]',
        colors            TEXT NOT NULL DEFAULT '[]',
        sketch_paths      TEXT NOT NULL DEFAULT '[]',
        tech_pack_path    TEXT,
        sample_status     TEXT NOT NULL DEFAULT 'PENDING',
        description       TEXT,
        meta_tags         TEXT NOT NULL DEFAULT '[]',
        planned_launch_at TEXT,
        reference         TEXT,
        created_at        TEXT NOT NULL,
        updated_at        TEXT NOT NULL
    );
    CREATE INDEX products_sequence ON products (family, season, year);
    CREATE INDEX products_created_at ON products (created_at);

    CREATE TABLE samples (
        id                   TEXT PRIMARY KEY,
        product_id           TEXT NOT NULL UNIQUE REFERENCES products (id) ON DELETE CASCADE,
        sample_photo_paths   TEXT NOT NULL DEFAULT '[]',
        detail_photo_paths   TEXT NOT NULL DEFAULT '[]',
        review_photo_paths   TEXT NOT NULL DEFAULT '[]',
        review_notes         TEXT,
        packshot_paths       TEXT NOT NULL DEFAULT '[]',
        definitive_colors    TEXT NOT NULL DEFAULT '[]',
        definitive_materials TEXT NOT NULL DEFAULT '[]',
        created_at           TEXT NOT NULL,
        updated_at           TEXT NOT NULL
    );

    CREATE TABLE events (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT,
        event_type  TEXT NOT NULL,
        status      TEXT NOT NULL DEFAULT 'DRAFT',
        start_at    TEXT NOT NULL,
        end_at      TEXT,
        location    TEXT,
        venue       TEXT,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    CREATE INDEX events_start_at ON events (start_at);

    CREATE TABLE campaigns (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        description   TEXT,
        campaign_type TEXT NOT NULL,
        status        TEXT NOT NULL DEFAULT 'DRAFT',
        start_at      TEXT,
        end_at        TEXT,
        budget        REAL,
        currency      TEXT NOT NULL DEFAULT 'EUR',
        event_id      TEXT REFERENCES events (id) ON DELETE SET NULL,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    );
    CREATE INDEX campaigns_event_id ON campaigns (event_id);

    CREATE TABLE event_products (
        event_id   TEXT NOT NULL REFERENCES events (id) ON DELETE CASCADE,
        product_id TEXT NOT NULL REFERENCES products (id) ON DELETE CASCADE,
        notes      TEXT,
        look       INTEGER,
        created_at TEXT NOT NULL,
        PRIMARY KEY (event_id, product_id)
    );
    CREATE INDEX event_products_product_id ON event_products (product_id);

    CREATE TABLE campaign_products (
        campaign_id TEXT NOT NULL REFERENCES campaigns (id) ON DELETE CASCADE,
        product_id  TEXT NOT NULL REFERENCES products (id) ON DELETE CASCADE,
        notes       TEXT,
        created_at  TEXT NOT NULL,
        PRIMARY KEY (campaign_id, product_id)
    );
    CREATE INDEX campaign_products_product_id ON campaign_products (product_id);
    "#,
];

pub fn schema_version(conn: &Connection) -> RepoResult<usize> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("Reading schema version failed")
        .context(Error::Database)?;
    Ok(version as usize)
}

/// Applies pending migrations, each one in its own transaction
pub fn migrate(conn: &mut Connection) -> RepoResult<()> {
    let current = schema_version(conn)?;
    if current > MIGRATIONS.len() {
        return Err(format_err!(
            "Database schema version {} is newer than this build knows ({})",
            current,
            MIGRATIONS.len()
        ).context(Error::Database)
        .into());
    }

    for (idx, migration) in MIGRATIONS.iter().enumerate().skip(current) {
        let version = idx + 1;
        info!("Applying schema migration {}", version);
        let tx = conn
            .transaction()
            .context("Starting migration transaction failed")
            .context(Error::Database)?;
        tx.execute_batch(migration)
            .with_context(|_| format!("Schema migration {} failed", version))
            .context(Error::Database)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", version))
            .context("Bumping schema version failed")
            .context(Error::Database)?;
        tx.commit()
            .context("Committing migration failed")
            .context(Error::Database)?;
    }
    Ok(())
}
