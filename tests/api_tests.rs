use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use claims_validator::{api, ValidatorService};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::router(Arc::new(ValidatorService::default()))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

fn overcharged_packet() -> Value {
    json!({
        "packet_id": "pkt-1",
        "documents": [
            {
                "envelope": {"doc_id": "eob-1", "classified_type": "EOB"},
                "extracted_data": {
                    "provider": {"name": "Hospital A"},
                    "date_of_service_start": "2024-01-15",
                    "total_billed": 1000,
                    "total_patient_responsibility": 200
                }
            },
            {
                "envelope": {"doc_id": "bill-1", "classified_type": "MEDICAL_BILL"},
                "extracted_data": {
                    "provider": {"name": "Hospital A"},
                    "date_of_service_start": "2024-01-15",
                    "total_charges": 1000,
                    "insurance_payments": 500,
                    "balance_due": 500
                }
            }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, b"OK");
}

#[tokio::test]
async fn test_validate_returns_report() {
    let response = app()
        .oneshot(post_json("/api/validate", &overcharged_packet()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(report["packet_id"], "pkt-1");
    assert_eq!(report["document_count"], 2);

    let results = report["validation_results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["check_name"], "eob_vs_bill_amount");
    assert_eq!(results[0]["severity"], "HIGH");
    assert_eq!(results[0]["status"], "MISMATCH");
    assert_eq!(results[0]["potential_overcharge"], 300.0);
    assert_eq!(results[0]["document_ids"], json!(["eob-1", "bill-1"]));
    assert_eq!(report["severity_counts"]["high"], 1);
    assert_eq!(report["financial_summary"]["potential_savings"], 300.0);
}

#[tokio::test]
async fn test_validate_empty_packet() {
    let response = app()
        .oneshot(post_json("/api/validate", &json!({"documents": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(report["validation_results"], json!([]));
    assert_eq!(report["recommended_actions"], json!([]));
}

#[tokio::test]
async fn test_validate_rejects_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_batch_validates_each_packet() {
    let body = json!({
        "packets": [
            overcharged_packet(),
            {"packet_id": "pkt-2", "documents": []}
        ]
    });
    let response = app()
        .oneshot(post_json("/api/validate/batch", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload: Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(payload["success"], true);
    assert_eq!(payload["message"], "Validated 2 packets, 1 findings, 1 flagged issues");
    let reports = payload["reports"].as_array().unwrap();
    assert_eq!(reports[0]["packet_id"], "pkt-1");
    assert_eq!(reports[1]["packet_id"], "pkt-2");
}

#[tokio::test]
async fn test_csv_export_endpoint() {
    let response = app()
        .oneshot(post_json("/api/validate/csv", &overcharged_packet()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let body = String::from_utf8(read_body(response).await).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("check_name,status,severity,detail,potential_overcharge,recommendation,document_ids")
    );
    assert!(lines.next().unwrap().starts_with("eob_vs_bill_amount,MISMATCH,HIGH,"));
    assert_eq!(lines.next(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn test_single_worker_serves_concurrent_validations() {
    let router = app();
    let (report, csv, health) = tokio::join!(
        router.clone().oneshot(post_json("/api/validate", &overcharged_packet())),
        router.clone().oneshot(post_json("/api/validate/csv", &overcharged_packet())),
        router.clone().oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()),
    );
    assert_eq!(report.unwrap().status(), StatusCode::OK);
    assert_eq!(csv.unwrap().status(), StatusCode::OK);
    assert_eq!(health.unwrap().status(), StatusCode::OK);
}
