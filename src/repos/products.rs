use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::types::Json;
use super::RepoResult;
use errors::Error;
use models::*;

const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "sku",
    "family",
    "season",
    "year",
    "size_range",
    "sizes",
    "measurements",
    "materials",
    "colors",
    "sketch_paths",
    "tech_pack_path",
    "sample_status",
    "description",
    "meta_tags",
    "planned_launch_at",
    "reference",
    "created_at",
    "updated_at",
];

/// Product columns for a select, qualified with `alias`
pub fn product_columns(alias: &str) -> String {
    PRODUCT_COLUMNS
        .iter()
        .map(|column| format!("{}.{}", alias, column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reads a product selected with `product_columns`, starting at column `offset`
pub fn product_from_row(row: &Row, offset: usize) -> ::rusqlite::Result<Product> {
    let Json(sizes) = row.get(offset + 7)?;
    let measurements: Option<Json<_>> = row.get(offset + 8)?;
    let Json(materials) = row.get(offset + 9)?;
    let Json(colors) = row.get(offset + 10)?;
    let Json(sketch_paths) = row.get(offset + 11)?;
    let Json(meta_tags) = row.get(offset + 15)?;
    Ok(Product {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        sku: row.get(offset + 2)?,
        family: row.get(offset + 3)?,
        season: row.get(offset + 4)?,
        year: row.get(offset + 5)?,
        size_range: row.get(offset + 6)?,
        sizes,
        measurements: measurements.map(|Json(value)| value),
        materials,
        colors,
        sketch_paths,
        tech_pack_path: row.get(offset + 12)?,
        sample_status: row.get(offset + 13)?,
        description: row.get(offset + 14)?,
        meta_tags,
        planned_launch_at: row.get(offset + 16)?,
        reference: row.get(offset + 17)?,
        created_at: row.get(offset + 18)?,
        updated_at: row.get(offset + 19)?,
    })
}

pub trait ProductsRepo {
    /// Newest first, filtered by the terms that are set
    fn list(&self, terms: &ProductsSearchTerms) -> RepoResult<Vec<Product>>;
    fn recent(&self, limit: u32) -> RepoResult<Vec<Product>>;
    fn get(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn count(&self, status: Option<SampleStatus>) -> RepoResult<i64>;
    /// Products already created for a family, season and year
    fn count_in_sequence(&self, family: &str, season: &str, year: i32) -> RepoResult<u32>;
    fn sku_exists(&self, sku: &str) -> RepoResult<bool>;
    fn insert(&self, product: &Product) -> RepoResult<()>;
    /// Writes every field but `sku` and `created_at`
    fn update(&self, product: &Product) -> RepoResult<()>;
    fn delete(&self, id: ProductId) -> RepoResult<bool>;
}

pub struct ProductsRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> ProductsRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }

    fn select(&self, filter: &str) -> String {
        format!("SELECT {} FROM products p {}", product_columns("p"), filter)
    }
}

impl<'a> ProductsRepo for ProductsRepoImpl<'a> {
    fn list(&self, terms: &ProductsSearchTerms) -> RepoResult<Vec<Product>> {
        debug!("Listing products with {:?}", terms);
        let sql = self.select(
            "WHERE (?1 IS NULL OR p.sample_status = ?1) \
             AND (?2 IS NULL OR p.family = ?2) \
             AND (?3 IS NULL OR p.season = ?3) \
             ORDER BY p.created_at DESC",
        );
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing products list failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![terms.status, terms.family, terms.season], |row| product_from_row(row, 0))
            .context("Listing products failed")
            .context(Error::Database)?;
        let products = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading products failed")
            .context(Error::Database)?;
        Ok(products)
    }

    fn recent(&self, limit: u32) -> RepoResult<Vec<Product>> {
        let sql = self.select("ORDER BY p.created_at DESC LIMIT ?1");
        let mut stmt = self.db_conn.prepare(&sql).context("Preparing recent products failed").context(Error::Database)?;
        let rows = stmt
            .query_map(params![limit], |row| product_from_row(row, 0))
            .context("Listing recent products failed")
            .context(Error::Database)?;
        let products = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Reading products failed")
            .context(Error::Database)?;
        Ok(products)
    }

    fn get(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let product = self
            .db_conn
            .query_row(&self.select("WHERE p.id = ?1"), params![id], |row| product_from_row(row, 0))
            .optional()
            .with_context(|_| format!("Getting product {} failed", id))
            .context(Error::Database)?;
        Ok(product)
    }

    fn count(&self, status: Option<SampleStatus>) -> RepoResult<i64> {
        let count = self
            .db_conn
            .query_row(
                "SELECT COUNT(*) FROM products WHERE ?1 IS NULL OR sample_status = ?1",
                params![status],
                |row| row.get(0),
            ).context("Counting products failed")
            .context(Error::Database)?;
        Ok(count)
    }

    fn count_in_sequence(&self, family: &str, season: &str, year: i32) -> RepoResult<u32> {
        let count = self
            .db_conn
            .query_row(
                "SELECT COUNT(*) FROM products WHERE family = ?1 AND season = ?2 AND year = ?3",
                params![family, season, year],
                |row| row.get(0),
            ).with_context(|_| format!("Counting products of {} {} {} failed", family, season, year))
            .context(Error::Database)?;
        Ok(count)
    }

    fn sku_exists(&self, sku: &str) -> RepoResult<bool> {
        let exists = self
            .db_conn
            .query_row("SELECT EXISTS (SELECT 1 FROM products WHERE sku = ?1)", params![sku], |row| row.get(0))
            .with_context(|_| format!("Looking up sku {} failed", sku))
            .context(Error::Database)?;
        Ok(exists)
    }

    fn insert(&self, product: &Product) -> RepoResult<()> {
        debug!("Inserting product {} ({})", product.id, product.sku);
        self.db_conn
            .execute(
                "INSERT INTO products (id, name, sku, family, season, year, size_range, sizes, measurements, \
                 materials, colors, sketch_paths, tech_pack_path, sample_status, description, meta_tags, \
                 planned_launch_at, reference, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                params![
                    product.id,
                    product.name,
                    product.sku,
                    product.family,
                    product.season,
                    product.year,
                    product.size_range,
                    Json(&product.sizes),
                    product.measurements.as_ref().map(Json),
                    Json(&product.materials),
                    Json(&product.colors),
                    Json(&product.sketch_paths),
                    product.tech_pack_path,
                    product.sample_status,
                    product.description,
                    Json(&product.meta_tags),
                    product.planned_launch_at,
                    product.reference,
                    product.created_at,
                    product.updated_at,
                ],
            ).with_context(|_| format!("Inserting product {} failed", product.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        debug!("Updating product {}", product.id);
        self.db_conn
            .execute(
                "UPDATE products SET name = ?2, family = ?3, season = ?4, year = ?5, size_range = ?6, sizes = ?7, \
                 measurements = ?8, materials = ?9, colors = ?10, sketch_paths = ?11, tech_pack_path = ?12, \
                 sample_status = ?13, description = ?14, meta_tags = ?15, planned_launch_at = ?16, \
                 reference = ?17, updated_at = ?18 \
                 WHERE id = ?1",
                params![
                    product.id,
                    product.name,
                    product.family,
                    product.season,
                    product.year,
                    product.size_range,
                    Json(&product.sizes),
                    product.measurements.as_ref().map(Json),
                    Json(&product.materials),
                    Json(&product.colors),
                    Json(&product.sketch_paths),
                    product.tech_pack_path,
                    product.sample_status,
                    product.description,
                    Json(&product.meta_tags),
                    product.planned_launch_at,
                    product.reference,
                    product.updated_at,
                ],
            ).with_context(|_| format!("Updating product {} failed", product.id))
            .context(Error::Database)?;
        Ok(())
    }

    fn delete(&self, id: ProductId) -> RepoResult<bool> {
        debug!("Deleting product {}", id);
        let deleted = self
            .db_conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .with_context(|_| format!("Deleting product {} failed", id))
            .context(Error::Database)?;
        Ok(deleted > 0)
    }
}
