use chrono::Utc;
use failure::ResultExt;
use rusqlite::TransactionBehavior;

use super::products::find_product;
use super::report::render_non_validation_report;
use super::types::ServiceFuture;
use super::Service;
use errors::Error;
use models::*;
use repos::*;

pub trait SamplesService {
    /// The sample of a product, `None` while nothing was recorded
    fn get_sample(&self, product_id: ProductId) -> ServiceFuture<Option<Sample>>;
    /// Creates the sample or merges the payload into it. `true` when it was created.
    fn upsert_sample(&self, product_id: ProductId, payload: UpdateSample) -> ServiceFuture<(bool, Sample)>;
    /// Html report of a rejected sample
    fn non_validation_report(&self, product_id: ProductId) -> ServiceFuture<String>;
}

impl SamplesService for Service {
    fn get_sample(&self, product_id: ProductId) -> ServiceFuture<Option<Sample>> {
        debug!("Getting sample of product {}", product_id);
        self.spawn_on_pool(move |conn| {
            find_product(conn, product_id)?;
            SamplesRepoImpl::new(conn).get_by_product(product_id)
        })
    }

    fn upsert_sample(&self, product_id: ProductId, payload: UpdateSample) -> ServiceFuture<(bool, Sample)> {
        debug!("Writing sample of product {}: {:?}", product_id, payload);
        self.spawn_on_pool(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("Starting sample write failed")
                .context(Error::Database)?;
            let res = {
                let product = find_product(&tx, product_id)?;
                if payload.touches_final_product() && !product.sample_status.unlocks_final_product() {
                    return Err(format_err!(
                        "Packshots and definitive colors or materials need a validated sample, product {} is {}",
                        product_id,
                        product.sample_status
                    ).context(Error::Workflow)
                    .into());
                }

                let repo = SamplesRepoImpl::new(&tx);
                let now = Utc::now();
                match repo.get_by_product(product_id)? {
                    Some(mut sample) => {
                        if payload.apply(&mut sample, now) {
                            repo.update(&sample)?;
                        }
                        (false, sample)
                    }
                    None => {
                        let sample = payload.into_sample(product_id, now);
                        repo.insert(&sample)?;
                        (true, sample)
                    }
                }
            };
            tx.commit().context("Committing sample write failed").context(Error::Database)?;
            Ok(res)
        })
    }

    fn non_validation_report(&self, product_id: ProductId) -> ServiceFuture<String> {
        debug!("Rendering non-validation report of product {}", product_id);
        self.spawn_on_pool(move |conn| {
            let product = find_product(conn, product_id)?;
            if !product.sample_status.allows_supplier_report() {
                return Err(format_err!(
                    "The supplier report is only available for rejected samples, product {} is {}",
                    product_id,
                    product.sample_status
                ).context(Error::Workflow)
                .into());
            }
            let sample = SamplesRepoImpl::new(conn).get_by_product(product_id)?;
            Ok(render_non_validation_report(&product, sample.as_ref(), Utc::now()))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::Future;
    use hyper::StatusCode;
    use serde_json;
    use tempfile::TempDir;

    use super::*;
    use http::errors::status_of;
    use services::tests::create_service;
    use services::ProductsService;

    fn product(service: &Service) -> Product {
        let payload: NewProduct = serde_json::from_value(json!({
            "name": "Saddle bag",
            "family": "leather-goods",
            "season": "PRE-FALL",
            "year": 2026,
            "sizeRange": "U",
        })).unwrap();
        service.create_product(payload).wait().unwrap()
    }

    fn set_status(service: &Service, product_id: ProductId, status: SampleStatus) {
        let update = UpdateProduct {
            sample_status: Some(status),
            ..UpdateProduct::default()
        };
        service.update_product(product_id, update).wait().unwrap();
    }

    fn payload(json: &str) -> UpdateSample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn second_write_merges_into_the_sample() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let product = product(&service);
        assert_eq!(service.get_sample(product.id).wait().unwrap(), None);

        let (created, first) = service
            .upsert_sample(product.id, payload(r#"{"reviewNotes": "Strap too long"}"#))
            .wait()
            .unwrap();
        assert!(created);

        let (created, second) = service
            .upsert_sample(product.id, payload(r#"{"reviewNotes": "Strap too long"}"#))
            .wait()
            .unwrap();
        assert!(!created);
        assert_eq!(second, first);
        assert_eq!(service.get_sample(product.id).wait().unwrap(), Some(first));
    }

    #[test]
    fn final_fields_wait_for_validation_and_survive_rejection() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let product = product(&service);
        let final_fields = r#"{"packshotPaths": ["/uploads/packshots/1_front.jpg"], "definitiveColors": ["tan"]}"#;

        let e = service.upsert_sample(product.id, payload(final_fields)).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::Conflict);

        set_status(&service, product.id, SampleStatus::Validated);
        service.upsert_sample(product.id, payload(final_fields)).wait().unwrap();

        set_status(&service, product.id, SampleStatus::NotValidated);
        let sample = service.get_sample(product.id).wait().unwrap().unwrap();
        assert_eq!(sample.packshot_paths, vec!["/uploads/packshots/1_front.jpg".to_string()]);
        assert_eq!(sample.definitive_colors, vec!["tan".to_string()]);
    }

    #[test]
    fn report_follows_rejection() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let product = product(&service);

        let e = service.non_validation_report(product.id).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::Conflict);

        set_status(&service, product.id, SampleStatus::NotValidated);
        let html = service.non_validation_report(product.id).wait().unwrap();
        assert!(html.contains(&product.sku));
    }

    #[test]
    fn sample_of_missing_product_is_not_found() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let e = service.get_sample(ProductId::new()).wait().unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
        let e = service
            .upsert_sample(ProductId::new(), UpdateSample::default())
            .wait()
            .unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
    }
}
