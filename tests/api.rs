extern crate atelier_lib as lib;
extern crate futures;
extern crate hyper;
extern crate mime;
#[macro_use]
extern crate serde_json;
extern crate tempfile;

use futures::{Future, Stream};
use hyper::header::ContentType;
use hyper::server::{Request, Service};
use hyper::{Method, StatusCode, Uri};
use serde_json::Value;
use tempfile::TempDir;

use lib::config::{Config, Dashboard, Database, Storage};
use lib::controller::ControllerImpl;
use lib::http::Application;

const BOUNDARY: &str = "----atelierapitest";

struct TestApp {
    _dir: TempDir,
    app: Application<ControllerImpl>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_upload_limit(1024 * 1024)
    }

    fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            listen: "127.0.0.1:0".parse().unwrap(),
            thread_count: 2,
            database: Database {
                path: dir.path().join("atelier.sqlite3").to_string_lossy().into_owned(),
                busy_timeout_ms: 1000,
            },
            storage: Storage {
                uploads_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
                public_prefix: "/uploads".to_string(),
                max_upload_bytes,
            },
            dashboard: Dashboard::default(),
        };
        let service = lib::create_service(config).unwrap();
        TestApp {
            _dir: dir,
            app: Application::new(ControllerImpl::new(service)),
        }
    }

    fn send(&self, req: Request) -> (StatusCode, Option<ContentType>, Vec<u8>) {
        let response = self.app.call(req).wait().unwrap();
        let status = response.status();
        let content_type = response.headers().get::<ContentType>().cloned();
        let body = response.body().concat2().wait().unwrap().to_vec();
        (status, content_type, body)
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::new(method, path.parse::<Uri>().unwrap());
        if let Some(body) = body {
            req.set_body(body.to_string());
        }
        let (status, _, body) = self.send(req);
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::Get, path, None)
    }

    fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::Post, path, Some(body))
    }

    fn create_product(&self, family: &str, season: &str) -> Value {
        let (status, product) = self.post(
            "/products",
            json!({
                "name": "Wrap coat",
                "family": family,
                "season": season,
                "year": 2026,
                "sizeRange": "XS-XL",
                "sizes": ["XS", "S", "M"],
                "colors": ["camel"],
            }),
        );
        assert_eq!(status, StatusCode::Created);
        product
    }

    fn set_status(&self, product_id: &str, status: &str) {
        let (code, _) = self.request(
            Method::Patch,
            &format!("/products/{}", product_id),
            Some(json!({ "sampleStatus": status })),
        );
        assert_eq!(code, StatusCode::Ok);
    }

    fn upload(&self, body: Vec<u8>) -> (StatusCode, Value) {
        let mut req = Request::new(Method::Post, "/upload".parse::<Uri>().unwrap());
        let media_type: mime::Mime = format!("multipart/form-data; boundary={}", BOUNDARY).parse().unwrap();
        req.headers_mut().set(ContentType(media_type));
        req.set_body(body);
        let (status, _, body) = self.send(req);
        (status, serde_json::from_slice(&body).unwrap())
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

fn form_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for &(name, filename, content) in fields {
        let disposition = match filename {
            Some(filename) => format!("form-data; name=\"{}\"; filename=\"{}\"", name, filename),
            None => format!("form-data; name=\"{}\"", name),
        };
        body.extend_from_slice(format!("--{}\r\nContent-Disposition: {}\r\n\r\n", BOUNDARY, disposition).as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[test]
fn healthcheck_answers_ok() {
    let app = TestApp::new();
    assert_eq!(app.get("/healthcheck"), (StatusCode::Ok, json!("Ok")));
}

#[test]
fn skus_follow_the_sequence_and_never_change() {
    let app = TestApp::new();
    let first = app.create_product("pret-a-porter", "FALL-WINTER");
    let second = app.create_product("pret-a-porter", "FALL-WINTER");
    let shoes = app.create_product("shoes", "SPRING-SUMMER");

    assert_eq!(first["sku"], "PAP-FW26-0001");
    assert_eq!(second["sku"], "PAP-FW26-0002");
    assert_eq!(shoes["sku"], "SHO-SS26-0001");
    assert_eq!(first["sampleStatus"], "PENDING");

    let (status, updated) = app.request(
        Method::Patch,
        &format!("/products/{}", id_of(&first)),
        Some(json!({"sku": "FAKE-0000", "name": "Belted wrap coat", "family": "shoes"})),
    );
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(updated["sku"], "PAP-FW26-0001");
    assert_eq!(updated["name"], "Belted wrap coat");
    assert_eq!(updated["sizes"], json!(["XS", "S", "M"]));
}

#[test]
fn products_are_filtered_and_newest_first() {
    let app = TestApp::new();
    let coat = app.create_product("pret-a-porter", "FALL-WINTER");
    let boot = app.create_product("shoes", "FALL-WINTER");
    app.set_status(&id_of(&boot), "NOT_VALIDATED");

    let (status, all) = app.get("/products");
    assert_eq!(status, StatusCode::Ok);
    let skus = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(skus, vec![boot["sku"].as_str().unwrap(), coat["sku"].as_str().unwrap()]);

    let (_, rejected) = app.get("/products?status=NOT_VALIDATED");
    assert_eq!(rejected.as_array().unwrap().len(), 1);
    assert_eq!(rejected[0]["id"], boot["id"]);
    assert_eq!(rejected[0]["sample"], Value::Null);
    assert_eq!(rejected[0]["campaigns"], json!([]));

    let (_, coats) = app.get("/products?family=pret-a-porter&season=FALL-WINTER");
    assert_eq!(coats.as_array().unwrap().len(), 1);

    let (status, error) = app.get("/products?status=SOMEDAY");
    assert_eq!(status, StatusCode::BadRequest);
    assert_eq!(error["code"], 400);
}

#[test]
fn errors_are_rendered_as_json() {
    let app = TestApp::new();

    let (status, error) = app.get("/products/6c1b8a5e-9d4f-4d57-a0a4-2b1c0d6f7e21");
    assert_eq!(status, StatusCode::NotFound);
    assert_eq!(error["code"], 404);
    assert_eq!(
        error["description"],
        "Product 6c1b8a5e-9d4f-4d57-a0a4-2b1c0d6f7e21 not found"
    );

    let (status, _) = app.get("/products/not-a-uuid");
    assert_eq!(status, StatusCode::NotFound);

    let mut req = Request::new(Method::Post, "/products".parse::<Uri>().unwrap());
    req.set_body("{\"name\": ");
    let (status, _, _) = app.send(req);
    assert_eq!(status, StatusCode::UnprocessableEntity);

    let (status, error) = app.post(
        "/products",
        json!({"name": "", "family": "shoes", "season": "CRUISE", "year": 2026, "sizeRange": "36-41"}),
    );
    assert_eq!(status, StatusCode::BadRequest);
    assert!(error["payload"]["name"].is_array());
}

#[test]
fn sample_workflow_gates_final_product_fields() {
    let app = TestApp::new();
    let product = app.create_product("leather-goods", "PRE-FALL");
    let product_id = id_of(&product);
    let sample_path = format!("/products/{}/sample", product_id);

    assert_eq!(app.get(&sample_path), (StatusCode::Ok, Value::Null));

    let review = json!({"samplePhotoPaths": ["/uploads/samples/1_bag.jpg"], "reviewNotes": "Handle stitching uneven"});
    let (status, created) = app.post(&sample_path, review.clone());
    assert_eq!(status, StatusCode::Created);
    let (status, merged) = app.post(&sample_path, review.clone());
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(merged, created);
    let (status, put) = app.request(Method::Put, &sample_path, Some(review));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(put, created);

    let final_fields = json!({"packshotPaths": ["/uploads/packshots/1_bag.jpg"], "definitiveMaterials": ["calfskin"]});
    let (status, error) = app.request(Method::Put, &sample_path, Some(final_fields.clone()));
    assert_eq!(status, StatusCode::Conflict);
    assert_eq!(error["code"], 409);

    let (status, _) = app.request(
        Method::Patch,
        &format!("/products/{}", product_id),
        Some(json!({"plannedLaunchAt": "2026-09-01"})),
    );
    assert_eq!(status, StatusCode::Conflict);

    app.set_status(&product_id, "VALIDATED");
    let (status, sample) = app.request(Method::Put, &sample_path, Some(final_fields));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(sample["definitiveMaterials"], json!(["calfskin"]));
    assert_eq!(sample["reviewNotes"], "Handle stitching uneven");

    let (status, plan) = app.get(&format!("/products/{}/launch", product_id));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(plan["product"]["id"], product["id"]);

    app.set_status(&product_id, "NOT_VALIDATED");
    let (_, sample) = app.get(&sample_path);
    assert_eq!(sample["packshotPaths"], json!(["/uploads/packshots/1_bag.jpg"]));
    assert_eq!(sample["definitiveMaterials"], json!(["calfskin"]));

    let (status, _) = app.get(&format!("/products/{}/launch", product_id));
    assert_eq!(status, StatusCode::Conflict);
}

#[test]
fn report_is_html_for_rejected_samples_only() {
    let app = TestApp::new();
    let product = app.create_product("jewelry", "CRUISE");
    let product_id = id_of(&product);

    let (status, _) = app.get(&format!("/products/{}/report", product_id));
    assert_eq!(status, StatusCode::Conflict);

    app.set_status(&product_id, "NOT_VALIDATED");
    app.post(
        &format!("/products/{}/sample", product_id),
        json!({"reviewNotes": "Clasp opens too easily"}),
    );

    let req = Request::new(Method::Get, format!("/products/{}/pdf", product_id).parse::<Uri>().unwrap());
    let (status, content_type, body) = app.send(req);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(content_type, Some(ContentType::html()));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Clasp opens too easily"));
    assert!(html.contains(product["sku"].as_str().unwrap()));
}

#[test]
fn unlinking_keeps_products_events_and_campaigns() {
    let app = TestApp::new();
    let product = app.create_product("accessories", "SPRING-SUMMER");
    let product_id = id_of(&product);

    let (status, event) = app.post(
        "/events",
        json!({"name": "SS26 show", "type": "SHOW", "startAt": "2026-09-28", "venue": "Palais"}),
    );
    assert_eq!(status, StatusCode::Created);
    assert_eq!(event["status"], "DRAFT");
    let event_id = id_of(&event);

    let (status, campaign) = app.post(
        "/campaigns",
        json!({"name": "SS26 teaser", "type": "SOCIAL", "eventId": event_id, "budget": 2500}),
    );
    assert_eq!(status, StatusCode::Created);
    assert_eq!(campaign["currency"], "EUR");
    let campaign_id = id_of(&campaign);

    let (status, link) = app.post(
        &format!("/events/{}/products", event_id),
        json!({"productId": product_id, "look": 12}),
    );
    assert_eq!(status, StatusCode::Created);
    assert_eq!(link["look"], 12);
    let (status, link) = app.post(
        &format!("/events/{}/products", event_id),
        json!({"productId": product_id, "look": 3, "notes": "closing look"}),
    );
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(link["look"], 3);

    let (status, _) = app.post(
        &format!("/campaigns/{}/products", campaign_id),
        json!({"productId": product_id, "notes": "hero"}),
    );
    assert_eq!(status, StatusCode::Created);

    let (_, details) = app.get(&format!("/products/{}", product_id));
    assert_eq!(details["events"][0]["event"]["id"], event["id"]);
    assert_eq!(details["events"][0]["notes"], "closing look");
    assert_eq!(details["campaigns"][0]["campaign"]["id"], campaign["id"]);

    let (_, event_details) = app.get(&format!("/events/{}", event_id));
    assert_eq!(event_details["campaigns"][0]["id"], campaign["id"]);
    assert_eq!(event_details["campaigns"][0]["products"][0]["product"]["id"], product["id"]);

    let (status, deleted) = app.request(
        Method::Delete,
        &format!("/events/{}/products", event_id),
        Some(json!({ "productId": product_id })),
    );
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(deleted, json!({"success": true}));
    let (status, _) = app.request(
        Method::Delete,
        &format!("/campaigns/{}/products/{}", campaign_id, product_id),
        None,
    );
    assert_eq!(status, StatusCode::Ok);
    let (status, _) = app.request(
        Method::Delete,
        &format!("/campaigns/{}/products/{}", campaign_id, product_id),
        None,
    );
    assert_eq!(status, StatusCode::NotFound);

    assert_eq!(app.get(&format!("/products/{}", product_id)).0, StatusCode::Ok);
    assert_eq!(app.get(&format!("/events/{}", event_id)).0, StatusCode::Ok);
    let (_, campaign_details) = app.get(&format!("/campaigns/{}", campaign_id));
    assert_eq!(campaign_details["products"], json!([]));
    assert_eq!(campaign_details["event"]["id"], event["id"]);
}

#[test]
fn deleting_a_product_removes_its_links() {
    let app = TestApp::new();
    let product = app.create_product("fragrance", "RESORT");
    let product_id = id_of(&product);
    let (_, event) = app.post("/events", json!({"name": "Press preview", "type": "PRESS", "startAt": "2026-06-01"}));
    let event_id = id_of(&event);
    app.post(&format!("/events/{}/products", event_id), json!({ "productId": product_id }));

    let (status, deleted) = app.request(Method::Delete, &format!("/products/{}", product_id), None);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(deleted["success"], true);

    let (_, event_details) = app.get(&format!("/events/{}", event_id));
    assert_eq!(event_details["products"], json!([]));
    let (status, _) = app.request(Method::Delete, &format!("/products/{}", product_id), None);
    assert_eq!(status, StatusCode::NotFound);
}

#[test]
fn uploads_are_stored_and_served_back() {
    let app = TestApp::new();

    let (status, error) = app.upload(form_body(&[("folder", None, b"sketches")]));
    assert_eq!(status, StatusCode::BadRequest);
    assert_eq!(error["description"], "No file provided");

    let (status, _) = app.post("/upload", json!({"file": "nope"}));
    assert_eq!(status, StatusCode::BadRequest);

    let (status, uploaded) = app.upload(form_body(&[
        ("folder", None, b"sketches"),
        ("file", Some("front view.png"), b"\x89PNG-front"),
    ]));
    assert_eq!(status, StatusCode::Ok);
    let path = uploaded["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/sketches/"));
    assert!(path.ends_with("_front_view.png"));

    let req = Request::new(Method::Get, path.parse::<Uri>().unwrap());
    let (status, content_type, body) = app.send(req);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(content_type, Some(ContentType::png()));
    assert_eq!(body, b"\x89PNG-front".to_vec());

    let (status, _) = app.get("/uploads/sketches/missing.png");
    assert_eq!(status, StatusCode::NotFound);
}

#[test]
fn sample_media_goes_to_nested_folders() {
    let app = TestApp::new();
    let product = app.create_product("shoes", "CRUISE");
    let folder = format!("samples/{}/packshots", id_of(&product));

    let (status, uploaded) = app.upload(form_body(&[
        ("folder", None, folder.as_bytes()),
        ("file", Some("side.jpg"), b"jpeg-side"),
    ]));
    assert_eq!(status, StatusCode::Ok);
    let path = uploaded["path"].as_str().unwrap().to_string();
    assert!(path.starts_with(&format!("/uploads/{}/", folder)));

    let req = Request::new(Method::Get, path.parse::<Uri>().unwrap());
    let (status, content_type, body) = app.send(req);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(content_type, Some(ContentType::jpeg()));
    assert_eq!(body, b"jpeg-side".to_vec());

    let (status, _) = app.upload(form_body(&[
        ("folder", None, b"samples/../../etc"),
        ("file", Some("side.jpg"), b"jpeg-side"),
    ]));
    assert_eq!(status, StatusCode::BadRequest);
}

#[test]
fn oversized_upload_is_refused() {
    let app = TestApp::with_upload_limit(256);
    let (status, error) = app.upload(form_body(&[("file", Some("big.png"), &[0u8; 1024][..])]));
    assert_eq!(status, StatusCode::PayloadTooLarge);
    assert_eq!(error["code"], 413);

    let (status, _) = app.upload(form_body(&[("file", Some("small.png"), b"tiny")]));
    assert_eq!(status, StatusCode::Ok);
}

#[test]
fn dashboard_summarizes_the_studio() {
    let app = TestApp::new();
    let product = app.create_product("small-leather-goods", "FALL-WINTER");
    app.set_status(&id_of(&product), "VALIDATED");
    app.create_product("small-leather-goods", "FALL-WINTER");

    let (status, summary) = app.get("/dashboard");
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(summary["counts"]["products"], 2);
    assert_eq!(summary["counts"]["validatedSamples"], 1);
    assert_eq!(summary["recentProducts"].as_array().unwrap().len(), 2);
    assert_eq!(summary["recentProducts"][1]["sku"], "SLG-FW26-0001");
}
