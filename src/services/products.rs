//! Products: creation with a generated sku, merged updates guarded by the sample
//! workflow, and the launch plan of validated products.

use chrono::Utc;
use failure::{Error as FailureError, ResultExt};
use rusqlite::{Connection, TransactionBehavior};
use validator::Validate;

use super::types::ServiceFuture;
use super::Service;
use errors::Error;
use models::sku::{generate_sku, SkuParams};
use models::*;
use repos::*;

pub trait ProductsService {
    /// Newest first, each with its sample and campaign links
    fn list_products(&self, terms: ProductsSearchTerms) -> ServiceFuture<Vec<ProductListItem>>;
    /// Creates a product with the next free sku of its family, season and year
    fn create_product(&self, payload: NewProduct) -> ServiceFuture<Product>;
    fn get_product(&self, product_id: ProductId) -> ServiceFuture<ProductDetails>;
    fn update_product(&self, product_id: ProductId, payload: UpdateProduct) -> ServiceFuture<Product>;
    /// Deletes the product together with its sample and links
    fn delete_product(&self, product_id: ProductId) -> ServiceFuture<Deleted>;
    /// Launch planning, open to validated products only
    fn launch_plan(&self, product_id: ProductId) -> ServiceFuture<LaunchPlan>;
}

/// Loads a product or fails with `NotFound`
pub fn find_product(conn: &Connection, product_id: ProductId) -> Result<Product, FailureError> {
    ProductsRepoImpl::new(conn)
        .get(product_id)?
        .ok_or_else(|| format_err!("Product {} not found", product_id).context(Error::NotFound).into())
}

/// Picks the sku for a new product: one past the products already in the sequence, moved
/// forward while taken. Must run inside the transaction that inserts the product.
pub fn next_sku(repo: &ProductsRepo, family: &str, season: &str, year: i32) -> Result<String, FailureError> {
    let mut index = repo.count_in_sequence(family, season, year)? + 1;
    loop {
        let sku = generate_sku(&SkuParams {
            family,
            season,
            year,
            index,
        });
        if !repo.sku_exists(&sku)? {
            return Ok(sku);
        }
        index += 1;
    }
}

impl ProductsService for Service {
    fn list_products(&self, terms: ProductsSearchTerms) -> ServiceFuture<Vec<ProductListItem>> {
        debug!("Listing products with terms {:?}", terms);
        self.spawn_on_pool(move |conn| {
            let products = ProductsRepoImpl::new(conn).list(&terms)?;
            let samples_repo = SamplesRepoImpl::new(conn);
            let campaign_products_repo = CampaignProductsRepoImpl::new(conn);
            products
                .into_iter()
                .map(|product| {
                    let sample = samples_repo.get_by_product(product.id)?;
                    let campaigns = campaign_products_repo.list_by_product(product.id)?;
                    Ok(ProductListItem {
                        product,
                        sample,
                        campaigns,
                    })
                }).collect::<Result<Vec<_>, FailureError>>()
        })
    }

    fn create_product(&self, payload: NewProduct) -> ServiceFuture<Product> {
        debug!("Creating product {:?}", payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting product creation failed")
                .context(Error::Database)?;
            let product = {
                let repo = ProductsRepoImpl::new(&tx);
                let sku = next_sku(&repo, &payload.family, &payload.season, payload.year)?;
                let product = payload.into_product(sku, Utc::now());
                repo.insert(&product)?;
                product
            };
            tx.commit().context("Committing product creation failed").context(Error::Database)?;

            info!("Created product {} with sku {}", product.id, product.sku);
            Ok(product)
        })
    }

    fn get_product(&self, product_id: ProductId) -> ServiceFuture<ProductDetails> {
        debug!("Getting product {}", product_id);
        self.spawn_on_pool(move |conn| {
            let product = find_product(conn, product_id)?;
            let sample = SamplesRepoImpl::new(conn).get_by_product(product_id)?;
            let campaigns = CampaignProductsRepoImpl::new(conn).list_with_campaigns(product_id)?;
            let events = EventProductsRepoImpl::new(conn).list_with_events(product_id)?;
            Ok(ProductDetails {
                product,
                sample,
                campaigns,
                events,
            })
        })
    }

    fn update_product(&self, product_id: ProductId, payload: UpdateProduct) -> ServiceFuture<Product> {
        debug!("Updating product {} with {:?}", product_id, payload);
        self.spawn_on_pool(move |conn| {
            payload.validate().map_err(Error::Validate)?;

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting product update failed")
                .context(Error::Database)?;
            let product = {
                let mut product = find_product(&tx, product_id)?;
                let schedules_launch = payload.schedules_launch();
                payload.apply(&mut product);
                if schedules_launch && !product.sample_status.unlocks_final_product() {
                    return Err(format_err!(
                        "Product {} cannot get a launch date while its sample is {}",
                        product_id,
                        product.sample_status
                    ).context(Error::Workflow)
                    .into());
                }
                product.updated_at = Utc::now();
                ProductsRepoImpl::new(&tx).update(&product)?;
                product
            };
            tx.commit().context("Committing product update failed").context(Error::Database)?;
            Ok(product)
        })
    }

    fn delete_product(&self, product_id: ProductId) -> ServiceFuture<Deleted> {
        debug!("Deleting product {}", product_id);
        self.spawn_on_pool(move |conn| {
            if ProductsRepoImpl::new(conn).delete(product_id)? {
                info!("Deleted product {}", product_id);
                Ok(Deleted { success: true })
            } else {
                Err(format_err!("Product {} not found", product_id).context(Error::NotFound).into())
            }
        })
    }

    fn launch_plan(&self, product_id: ProductId) -> ServiceFuture<LaunchPlan> {
        debug!("Getting launch plan of product {}", product_id);
        self.spawn_on_pool(move |conn| {
            let product = find_product(conn, product_id)?;
            if !product.sample_status.unlocks_final_product() {
                return Err(format_err!(
                    "Launch planning needs a validated sample, product {} is {}",
                    product_id,
                    product.sample_status
                ).context(Error::Workflow)
                .into());
            }
            let campaigns = CampaignProductsRepoImpl::new(conn).list_with_campaigns(product_id)?;
            let events = EventProductsRepoImpl::new(conn).list_with_events(product_id)?;
            let available_campaigns = CampaignsRepoImpl::new(conn).available_for_product(product_id)?;
            Ok(LaunchPlan {
                planned_launch_at: product.planned_launch_at,
                product,
                campaigns,
                events,
                available_campaigns,
            })
        })
    }
}
