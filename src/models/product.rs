use chrono::{DateTime, Utc};
use serde_json::Value;
use validator::Validate;

use super::date_format;
use super::deserialize_some;
use super::{CampaignProduct, CampaignProductWithCampaign, EventProductWithEvent, ProductId, Sample, SampleStatus};

/// A product of the collection, from first sketch to launch
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub family: String,
    pub season: String,
    pub year: i32,
    pub size_range: String,
    pub sizes: Vec<String>,
    pub measurements: Option<Value>,
    pub materials: Vec<String>,
    pub colors: Vec<String>,
    pub sketch_paths: Vec<String>,
    pub tech_pack_path: Option<String>,
    pub sample_status: SampleStatus,
    pub description: Option<String>,
    pub meta_tags: Vec<String>,
    pub planned_launch_at: Option<DateTime<Utc>>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating products. The sku is derived, never sent.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = "1", max = "200"))]
    pub name: String,
    #[validate(length(min = "1"))]
    pub family: String,
    #[validate(length(min = "1"))]
    pub season: String,
    #[validate(range(min = "1900", max = "2999"))]
    pub year: i32,
    #[validate(length(min = "1"))]
    pub size_range: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub measurements: Option<Value>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl NewProduct {
    pub fn into_product(self, sku: String, now: DateTime<Utc>) -> Product {
        Product {
            id: ProductId::new(),
            name: self.name,
            sku,
            family: self.family,
            season: self.season,
            year: self.year,
            size_range: self.size_range,
            sizes: self.sizes,
            measurements: self.measurements,
            materials: self.materials,
            colors: self.colors,
            sketch_paths: vec![],
            tech_pack_path: None,
            sample_status: SampleStatus::Pending,
            description: None,
            meta_tags: vec![],
            planned_launch_at: None,
            reference: self.reference,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a product. Absent fields are left alone, nullable fields take `null`
/// to clear. `sku` is not part of it: once generated it never changes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = "1", max = "200"))]
    pub name: Option<String>,
    #[validate(length(min = "1"))]
    pub family: Option<String>,
    #[validate(length(min = "1"))]
    pub season: Option<String>,
    #[validate(range(min = "1900", max = "2999"))]
    pub year: Option<i32>,
    #[validate(length(min = "1"))]
    pub size_range: Option<String>,
    pub sizes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub measurements: Option<Option<Value>>,
    pub materials: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub sketch_paths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub tech_pack_path: Option<Option<String>>,
    pub sample_status: Option<SampleStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub meta_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "date_format::deserialize_double_option")]
    pub planned_launch_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reference: Option<Option<String>>,
}

impl UpdateProduct {
    /// True when the payload sets (not clears) the planned launch date
    pub fn schedules_launch(&self) -> bool {
        match self.planned_launch_at {
            Some(Some(_)) => true,
            _ => false,
        }
    }

    /// Merges the payload into `product`. Timestamps are the caller's business.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(family) = self.family {
            product.family = family;
        }
        if let Some(season) = self.season {
            product.season = season;
        }
        if let Some(year) = self.year {
            product.year = year;
        }
        if let Some(size_range) = self.size_range {
            product.size_range = size_range;
        }
        if let Some(sizes) = self.sizes {
            product.sizes = sizes;
        }
        if let Some(measurements) = self.measurements {
            product.measurements = measurements;
        }
        if let Some(materials) = self.materials {
            product.materials = materials;
        }
        if let Some(colors) = self.colors {
            product.colors = colors;
        }
        if let Some(sketch_paths) = self.sketch_paths {
            product.sketch_paths = sketch_paths;
        }
        if let Some(tech_pack_path) = self.tech_pack_path {
            product.tech_pack_path = tech_pack_path;
        }
        if let Some(sample_status) = self.sample_status {
            product.sample_status = sample_status;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(meta_tags) = self.meta_tags {
            product.meta_tags = meta_tags;
        }
        if let Some(planned_launch_at) = self.planned_launch_at {
            product.planned_launch_at = planned_launch_at;
        }
        if let Some(reference) = self.reference {
            product.reference = reference;
        }
    }
}

/// Filters of `GET /products`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProductsSearchTerms {
    pub status: Option<SampleStatus>,
    pub family: Option<String>,
    pub season: Option<String>,
}

/// Row of the product list
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub sample: Option<Sample>,
    pub campaigns: Vec<CampaignProduct>,
}

/// Product page: the product with its sample and every link
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub sample: Option<Sample>,
    pub campaigns: Vec<CampaignProductWithCampaign>,
    pub events: Vec<EventProductWithEvent>,
}

/// Launch planning of a validated product
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPlan {
    pub product: Product,
    pub planned_launch_at: Option<DateTime<Utc>>,
    pub campaigns: Vec<CampaignProductWithCampaign>,
    pub events: Vec<EventProductWithEvent>,
    /// Campaigns the product could still join
    pub available_campaigns: Vec<super::Campaign>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json;

    use super::*;

    fn product() -> Product {
        let payload: NewProduct = serde_json::from_str(
            r#"{"name": "Trench", "family": "pret-a-porter", "season": "FALL-WINTER", "year": 2026, "sizeRange": "XS-XXL"}"#,
        ).unwrap();
        payload.into_product("PAP-FW26-0001".to_string(), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn new_product_starts_pending_with_empty_lists() {
        let product = product();
        assert_eq!(product.sample_status, SampleStatus::Pending);
        assert!(product.sizes.is_empty());
        assert!(product.sketch_paths.is_empty());
        assert_eq!(product.planned_launch_at, None);
    }

    #[test]
    fn absent_fields_are_kept_and_null_clears() {
        let mut product = product();
        product.description = Some("Double breasted".to_string());
        product.reference = Some("REF-1".to_string());

        let update: UpdateProduct = serde_json::from_str(r#"{"name": "Long trench", "reference": null}"#).unwrap();
        update.apply(&mut product);

        assert_eq!(product.name, "Long trench");
        assert_eq!(product.description, Some("Double breasted".to_string()));
        assert_eq!(product.reference, None);
    }

    #[test]
    fn sku_in_update_payload_is_ignored() {
        let mut product = product();
        let update: UpdateProduct = serde_json::from_str(r#"{"sku": "HACK-0000"}"#).unwrap();
        assert_eq!(update, UpdateProduct::default());
        update.apply(&mut product);
        assert_eq!(product.sku, "PAP-FW26-0001");
    }

    #[test]
    fn launch_scheduling_is_detected() {
        let set: UpdateProduct = serde_json::from_str(r#"{"plannedLaunchAt": "2026-09-01"}"#).unwrap();
        let cleared: UpdateProduct = serde_json::from_str(r#"{"plannedLaunchAt": null}"#).unwrap();
        assert!(set.schedules_launch());
        assert!(!cleared.schedules_launch());
        assert_eq!(cleared.planned_launch_at, Some(None));
        assert!(!UpdateProduct::default().schedules_launch());
    }

    #[test]
    fn blank_name_fails_validation() {
        let payload: NewProduct = serde_json::from_str(
            r#"{"name": "", "family": "shoes", "season": "CRUISE", "year": 2026, "sizeRange": "35-46"}"#,
        ).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn list_item_flattens_product_fields() {
        let item = ProductListItem {
            product: product(),
            sample: None,
            campaigns: vec![],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["sku"], "PAP-FW26-0001");
        assert_eq!(json["sampleStatus"], "PENDING");
        assert_eq!(json["sample"], Value::Null);
    }
}
