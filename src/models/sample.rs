use chrono::{DateTime, Utc};

use super::deserialize_some;
use super::{ProductId, SampleId};

/// Prototype of a product: photos and review of the physical sample, then the
/// final product material once the sample is validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: SampleId,
    pub product_id: ProductId,
    pub sample_photo_paths: Vec<String>,
    pub detail_photo_paths: Vec<String>,
    pub review_photo_paths: Vec<String>,
    pub review_notes: Option<String>,
    pub packshot_paths: Vec<String>,
    pub definitive_colors: Vec<String>,
    pub definitive_materials: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT|POST /products/{id}/sample`. Every field is optional and merged into
/// the stored sample, so sending the same payload twice stores the same thing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSample {
    pub sample_photo_paths: Option<Vec<String>>,
    pub detail_photo_paths: Option<Vec<String>>,
    pub review_photo_paths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub review_notes: Option<Option<String>>,
    pub packshot_paths: Option<Vec<String>>,
    pub definitive_colors: Option<Vec<String>>,
    pub definitive_materials: Option<Vec<String>>,
}

fn is_filled(list: &Option<Vec<String>>) -> bool {
    list.as_ref().map(|l| !l.is_empty()).unwrap_or(false)
}

impl UpdateSample {
    /// Whether the payload populates packshots or definitive colors/materials
    pub fn touches_final_product(&self) -> bool {
        is_filled(&self.packshot_paths) || is_filled(&self.definitive_colors) || is_filled(&self.definitive_materials)
    }

    /// Merges into an existing sample. Returns whether anything changed; `updated_at` only
    /// moves when it did.
    pub fn apply(self, sample: &mut Sample, now: DateTime<Utc>) -> bool {
        let before = sample.clone();
        if let Some(paths) = self.sample_photo_paths {
            sample.sample_photo_paths = paths;
        }
        if let Some(paths) = self.detail_photo_paths {
            sample.detail_photo_paths = paths;
        }
        if let Some(paths) = self.review_photo_paths {
            sample.review_photo_paths = paths;
        }
        if let Some(notes) = self.review_notes {
            sample.review_notes = notes;
        }
        if let Some(paths) = self.packshot_paths {
            sample.packshot_paths = paths;
        }
        if let Some(colors) = self.definitive_colors {
            sample.definitive_colors = colors;
        }
        if let Some(materials) = self.definitive_materials {
            sample.definitive_materials = materials;
        }

        let changed = *sample != before;
        if changed {
            sample.updated_at = now;
        }
        changed
    }

    pub fn into_sample(self, product_id: ProductId, now: DateTime<Utc>) -> Sample {
        let mut sample = Sample {
            id: SampleId::new(),
            product_id,
            sample_photo_paths: vec![],
            detail_photo_paths: vec![],
            review_photo_paths: vec![],
            review_notes: None,
            packshot_paths: vec![],
            definitive_colors: vec![],
            definitive_materials: vec![],
            created_at: now,
            updated_at: now,
        };
        self.apply(&mut sample, now);
        sample
    }
}
