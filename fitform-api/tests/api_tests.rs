//! Integration tests for fitform-api endpoints
//!
//! Tests cover:
//! - Health endpoint (model availability, parent count)
//! - Prediction: formula/predictor composition, brand priority, fallbacks
//! - Validation: inclusive range boundaries, gender formats
//! - Update: merge semantics, idempotence, key vocabulary, NotFound
//! - Retrieval: full record echo
//! - Dual-unit invariant: inches always derived from cm

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use fitform_api::engine::{BrandResolver, MeasurementEngine};
use fitform_api::model::BodyModel;
use fitform_api::store::MeasurementStore;
use fitform_api::{build_router, AppState};
use fitform_common::Result;

/// Fixed predictor stand-in: waist, hip, bicep, wrist, plus an extra
/// value the engine must ignore
struct StubModel;

impl BodyModel for StubModel {
    fn predict(&self, _features: &[f64; 4]) -> Result<Vec<f64>> {
        Ok(vec![52.0, 61.0, 17.5, 12.3, 99.0])
    }
}

const DATASET: &str = "\
Brand,Age (Years),Chest (cm),Waist (cm),Hips (cm)
H&M (B),7,58,52–56,60
H&M (G),7,57,51,59
Zara Kids,10&11,71–78,64,74
Mothercare,6,,61–65,
";

/// Test helper: build the app over a fresh temp data folder
fn setup_app(dir: &TempDir, with_model: bool) -> axum::Router {
    let dataset_path = dir.path().join("brandsize.csv");
    std::fs::write(&dataset_path, DATASET).expect("Should write dataset fixture");

    let model: Option<Arc<dyn BodyModel>> = if with_model {
        Some(Arc::new(StubModel))
    } else {
        None
    };

    let engine = MeasurementEngine::new(
        model,
        BrandResolver::new(dataset_path),
        MeasurementStore::new(dir.path().join("measurements.json")),
    );
    build_router(AppState::new(engine))
}

/// Test helper: JSON request with body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: bodyless request
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn predict_body(age: f64, gender: Value, brand: Option<&str>) -> Value {
    let mut body = json!({
        "parent_id": "p1",
        "child_id": "c1",
        "age": age,
        "gender": gender,
        "weight": 25.0,
        "height": 120.0,
    });
    if let Some(brand) = brand {
        body["brand"] = json!(brand);
    }
    body
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_with_model() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fitform-api");
    assert!(body["version"].is_string());
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["total_users"], 0);
}

#[tokio::test]
async fn test_health_counts_parents_after_prediction() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_users"], 1);
}

#[tokio::test]
async fn test_health_without_model() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, false);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["model_loaded"], false);
}

// =============================================================================
// Prediction Tests
// =============================================================================

#[tokio::test]
async fn test_predict_without_brand_composes_formulas_and_predictor() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["parent_id"], "p1");
    assert_eq!(body["child_id"], "c1");

    let cm = &body["measurements_cm"];
    // Tier-1 formulas: 120 * 0.47 / 0.23 / 0.32
    assert_eq!(cm["Chest"], 56.4);
    assert_eq!(cm["Shoulder"], 27.6);
    assert_eq!(cm["Sleeve"], 38.4);
    // Predictor values, positional
    assert_eq!(cm["Waist"], 52.0);
    assert_eq!(cm["Hip"], 61.0);
    assert_eq!(cm["Bicep"], 17.5);
    assert_eq!(cm["Wrist"], 12.3);
    // Tier-2 derived lengths
    assert_eq!(cm["Inseam"], 50.4);
    assert_eq!(cm["PantLength"], 56.4);
    assert_eq!(cm["NeckDepthFront"], 7.18);

    // Inches derived from cm for a spot-checked key
    assert_eq!(body["measurements_inches"]["Chest"], 22.2);
}

#[tokio::test]
async fn test_predict_persists_record() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let response = app.oneshot(get_request("/get-measurements/p1/c1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["is_predicted"], true);
    assert_eq!(body["is_manually_updated"], false);
    assert_eq!(body["input_parameters"]["gender"], "male");
    assert_eq!(body["input_parameters"]["brand"], Value::Null);
    assert!(body["prediction_timestamp"].is_string());
}

#[tokio::test]
async fn test_predict_with_brand_seeds_chart_values() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(10.0, json!("female"), Some("Zara")),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let cm = &body["measurements_cm"];
    // Chart wins for chest/waist/hip; "71–78" collapses to its mean
    assert_eq!(cm["Chest"], 74.5);
    assert_eq!(cm["Waist"], 64.0);
    assert_eq!(cm["Hip"], 74.0);
    // Predictor was skipped, so its exclusive keys are absent
    assert!(cm.get("Bicep").is_none());
    assert!(cm.get("Wrist").is_none());
}

#[tokio::test]
async fn test_predict_hm_uses_gender_marker() {
    let dir = TempDir::new().unwrap();

    let boy_request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), Some("H&M")),
    );
    let response = setup_app(&dir, true).oneshot(boy_request).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["measurements_cm"]["Chest"], 58.0);

    let girl_request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("female"), Some("H&M")),
    );
    let response = setup_app(&dir, true).oneshot(girl_request).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["measurements_cm"]["Chest"], 57.0);
}

#[tokio::test]
async fn test_predict_unknown_brand_behaves_like_no_brand() {
    let dir = TempDir::new().unwrap();

    let with_unknown = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), Some("NoSuchBrand")),
    );
    let response = setup_app(&dir, true).oneshot(with_unknown).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let unknown_body = extract_json(response.into_body()).await;

    let without = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    let response = setup_app(&dir, true).oneshot(without).await.unwrap();
    let plain_body = extract_json(response.into_body()).await;

    assert_eq!(unknown_body["measurements_cm"], plain_body["measurements_cm"]);
}

#[tokio::test]
async fn test_predict_empty_brand_behaves_like_no_brand() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), Some("")),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // Fell through to the predictor
    assert_eq!(body["measurements_cm"]["Waist"], 52.0);
    assert_eq!(body["measurements_cm"]["Bicep"], 17.5);
}

#[tokio::test]
async fn test_predict_accepts_integer_gender() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!(2), None),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/get-measurements/p1/c1")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["input_parameters"]["gender"], "female");
}

#[tokio::test]
async fn test_predict_without_model_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, false);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), Some("Zara")),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Model not initialized");
}

// =============================================================================
// Validation Tests
// =============================================================================

#[tokio::test]
async fn test_range_boundaries_are_inclusive() {
    // Accepted boundary values
    for (age, weight, height) in [
        (3.0, 25.0, 120.0),
        (18.0, 25.0, 120.0),
        (7.0, 10.0, 120.0),
        (7.0, 120.0, 120.0),
        (7.0, 25.0, 80.0),
        (7.0, 25.0, 220.0),
    ] {
        let dir = TempDir::new().unwrap();
        let app = setup_app(&dir, true);
        let body = json!({
            "parent_id": "p1", "child_id": "c1",
            "age": age, "gender": "male", "weight": weight, "height": height,
        });
        let response = app
            .oneshot(json_request("POST", "/predict-measurements", body))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "age={age} weight={weight} height={height}"
        );
    }
}

#[tokio::test]
async fn test_out_of_range_values_rejected() {
    let cases = [
        (json!(2.0), json!(25.0), json!(120.0), "between 3 and 18"),
        (json!(19.0), json!(25.0), json!(120.0), "between 3 and 18"),
        (json!(7.0), json!(5.0), json!(120.0), "between 10.0 and 120.0"),
        (json!(7.0), json!(25.0), json!(250.0), "between 80.0 and 220.0"),
    ];

    for (age, weight, height, expected) in cases {
        let dir = TempDir::new().unwrap();
        let app = setup_app(&dir, true);
        let body = json!({
            "parent_id": "p1", "child_id": "c1",
            "age": age, "gender": "male", "weight": weight, "height": height,
        });
        let response = app
            .oneshot(json_request("POST", "/predict-measurements", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert!(
            body["error"].as_str().unwrap().contains(expected),
            "expected '{expected}' in {:?}",
            body["error"]
        );
    }
}

#[tokio::test]
async fn test_invalid_gender_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("other"), None),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!(3), None),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("1 (male) or 2 (female)"));
}

#[tokio::test]
async fn test_empty_parent_id_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let body = json!({
        "parent_id": "", "child_id": "c1",
        "age": 7.0, "gender": "male", "weight": 25.0, "height": 120.0,
    });
    let response = app
        .oneshot(json_request("POST", "/predict-measurements", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("Parent ID"));
}

// =============================================================================
// Update Tests
// =============================================================================

#[tokio::test]
async fn test_update_unknown_child_not_found() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let body = json!({
        "parent_id": "p1", "child_id": "ghost",
        "measurements": { "Waist": 55.0 },
    });
    let response = app
        .oneshot(json_request("PUT", "/update-measurements", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Please make a prediction first"));
}

#[tokio::test]
async fn test_update_invalid_key_lists_vocabulary() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let body = json!({
        "parent_id": "p1", "child_id": "c1",
        "measurements": { "Foo": 55.0 },
    });
    let response = app
        .oneshot(json_request("PUT", "/update-measurements", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Invalid measurement key: Foo"));
    assert!(message.contains("Waist, Hip, Bicep, Neck, Wrist, Chest, Shoulder, Sleeve"));
}

#[tokio::test]
async fn test_update_rejects_non_positive_value() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let body = json!({
        "parent_id": "p1", "child_id": "c1",
        "measurements": { "Waist": -5.0 },
    });
    let response = app
        .oneshot(json_request("PUT", "/update-measurements", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Waist must be a positive number"));
}

#[tokio::test]
async fn test_update_merges_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let update = json!({
        "parent_id": "p1", "child_id": "c1",
        "measurements": { "Waist": 55.0, "Neck": 28.5 },
    });

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/update-measurements", update.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = extract_json(response.into_body()).await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/update-measurements", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = extract_json(response.into_body()).await;

    // Same final map both times; untouched keys survive the merge
    assert_eq!(first["measurements_cm"], second["measurements_cm"]);
    assert_eq!(second["measurements_cm"]["Waist"], 55.0);
    assert_eq!(second["measurements_cm"]["Neck"], 28.5);
    assert_eq!(second["measurements_cm"]["Chest"], 56.4);

    let response = app.oneshot(get_request("/get-measurements/p1/c1")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["is_manually_updated"], true);
    assert_eq!(body["is_predicted"], true);
}

#[tokio::test]
async fn test_inches_track_cm_after_update() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let request = json_request(
        "POST",
        "/predict-measurements",
        predict_body(7.0, json!("male"), None),
    );
    app.clone().oneshot(request).await.unwrap();

    let update = json!({
        "parent_id": "p1", "child_id": "c1",
        "measurements": { "Waist": 55.0 },
    });
    let response = app
        .oneshot(json_request("PUT", "/update-measurements", update))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let cm = body["measurements_cm"].as_object().unwrap();
    let inches = body["measurements_inches"].as_object().unwrap();
    assert_eq!(cm.len(), inches.len());
    for (key, value) in cm {
        let expected = (value.as_f64().unwrap() / 2.54 * 100.0).round() / 100.0;
        assert_eq!(inches[key].as_f64().unwrap(), expected, "{key}");
    }
}

// =============================================================================
// Retrieval Tests
// =============================================================================

#[tokio::test]
async fn test_get_unknown_pair_not_found() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, true);

    let response = app
        .oneshot(get_request("/get-measurements/p1/nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Child nobody under parent p1 not found"));
}
