use failure::ResultExt;
use rusqlite::{Connection, OptionalExtension, Row};

use super::types::Json;
use super::RepoResult;
use errors::Error;
use models::*;

const SAMPLE_COLUMNS: &str = "id, product_id, sample_photo_paths, detail_photo_paths, review_photo_paths, review_notes, \
                              packshot_paths, definitive_colors, definitive_materials, created_at, updated_at";

fn sample_from_row(row: &Row) -> ::rusqlite::Result<Sample> {
    let Json(sample_photo_paths) = row.get(2)?;
    let Json(detail_photo_paths) = row.get(3)?;
    let Json(review_photo_paths) = row.get(4)?;
    let Json(packshot_paths) = row.get(6)?;
    let Json(definitive_colors) = row.get(7)?;
    let Json(definitive_materials) = row.get(8)?;
    Ok(Sample {
        id: row.get(0)?,
        product_id: row.get(1)?,
        sample_photo_paths,
        detail_photo_paths,
        review_photo_paths,
        review_notes: row.get(5)?,
        packshot_paths,
        definitive_colors,
        definitive_materials,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub trait SamplesRepo {
    fn get_by_product(&self, product_id: ProductId) -> RepoResult<Option<Sample>>;
    fn insert(&self, sample: &Sample) -> RepoResult<()>;
    fn update(&self, sample: &Sample) -> RepoResult<()>;
}

pub struct SamplesRepoImpl<'a> {
    pub db_conn: &'a Connection,
}

impl<'a> SamplesRepoImpl<'a> {
    pub fn new(db_conn: &'a Connection) -> Self {
        Self { db_conn }
    }
}

impl<'a> SamplesRepo for SamplesRepoImpl<'a> {
    fn get_by_product(&self, product_id: ProductId) -> RepoResult<Option<Sample>> {
        let sample = self
            .db_conn
            .query_row(
                &format!("SELECT {} FROM samples WHERE product_id = ?1", SAMPLE_COLUMNS),
                params![product_id],
                sample_from_row,
            ).optional()
            .with_context(|_| format!("Getting sample of product {} failed", product_id))
            .context(Error::Database)?;
        Ok(sample)
    }

    fn insert(&self, sample: &Sample) -> RepoResult<()> {
        debug!("Inserting sample {} of product {}", sample.id, sample.product_id);
        self.db_conn
            .execute(
                &format!(
                    "INSERT INTO samples ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    SAMPLE_COLUMNS
                ),
                params![
                    sample.id,
                    sample.product_id,
                    Json(&sample.sample_photo_paths),
                    Json(&sample.detail_photo_paths),
                    Json(&sample.review_photo_paths),
                    sample.review_notes,
                    Json(&sample.packshot_paths),
                    Json(&sample.definitive_colors),
                    Json(&sample.definitive_materials),
                    sample.created_at,
                    sample.updated_at,
                ],
            ).with_context(|_| format!("Inserting sample of product {} failed", sample.product_id))
            .context(Error::Database)?;
        Ok(())
    }

    fn update(&self, sample: &Sample) -> RepoResult<()> {
        debug!("Updating sample {}", sample.id);
        self.db_conn
            .execute(
                "UPDATE samples SET sample_photo_paths = ?2, detail_photo_paths = ?3, review_photo_paths = ?4, \
                 review_notes = ?5, packshot_paths = ?6, definitive_colors = ?7, definitive_materials = ?8, \
                 updated_at = ?9 \
                 WHERE id = ?1",
                params![
                    sample.id,
                    Json(&sample.sample_photo_paths),
                    Json(&sample.detail_photo_paths),
                    Json(&sample.review_photo_paths),
                    sample.review_notes,
                    Json(&sample.packshot_paths),
                    Json(&sample.definitive_colors),
                    Json(&sample.definitive_materials),
                    sample.updated_at,
                ],
            ).with_context(|_| format!("Updating sample {} failed", sample.id))
            .context(Error::Database)?;
        Ok(())
    }
}
