use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use biztime::{app, app_with_body_limit, AppState, MemoryStore, Store};
use serde_json::{json, Value};
use tower::Service;

fn build_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    (app(AppState::new(store.clone())), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().call(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

fn apple() -> Value {
    json!({"code": "apple", "name": "Apple", "description": "Big Tech Company. Makes iPhones and Macs."})
}

fn apple_invoice() -> Value {
    json!({
        "comp_code": "apple",
        "amt": 500,
        "paid": false,
        "add_date": "2021-09-18T18:47:52.116Z",
        "paid_date": null
    })
}

#[tokio::test]
async fn empty_company_list_is_a_bad_request() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/companies", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": {"message": "No company data found.", "status": 400}}));
}

#[tokio::test]
async fn created_company_reads_back_with_no_invoices() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/companies", Some(apple())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"company": apple()}));

    let (status, body) = send(&app, "GET", "/companies/apple", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut expected = apple();
    expected["invoices"] = json!([]);
    assert_eq!(body, expected);

    let (status, body) = send(&app, "GET", "/companies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([apple()]));
}

#[tokio::test]
async fn company_detail_lists_its_invoices() {
    let (app, _) = build_app();
    send(&app, "POST", "/companies", Some(apple())).await;
    send(&app, "POST", "/invoices", Some(apple_invoice())).await;
    let mut other = apple_invoice();
    other["comp_code"] = json!("ibm");
    send(&app, "POST", "/invoices", Some(other)).await;

    let (_, body) = send(&app, "GET", "/companies/apple", None).await;
    assert_eq!(
        body["invoices"],
        json!([{
            "comp_code": "apple",
            "amt": 500.0,
            "paid": false,
            "add_date": "2021-09-18T18:47:52.116Z",
            "paid_date": null
        }])
    );
}

#[tokio::test]
async fn unknown_company_is_not_found() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/companies/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Not Found");
}

#[tokio::test]
async fn company_create_requires_every_field() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/companies", Some(json!({"code": "ibm", "name": "IBM"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add company.");

    let (status, body) = send(&app, "POST", "/companies", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add company.");
}

#[tokio::test]
async fn company_update_replaces_and_can_rename() {
    let (app, _) = build_app();
    send(&app, "POST", "/companies", Some(apple())).await;

    let renamed = json!({"code": "aapl", "name": "Apple Inc.", "description": "Renamed."});
    let (status, body) = send(&app, "PUT", "/companies/apple", Some(renamed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"company": renamed}));

    let (status, _) = send(&app, "GET", "/companies/apple", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "GET", "/companies/aapl", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Apple Inc.");
}

#[tokio::test]
async fn company_update_errors() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "PUT", "/companies/nope", Some(apple())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "No rows found.");

    send(&app, "POST", "/companies", Some(apple())).await;
    let (status, body) = send(&app, "PUT", "/companies/apple", Some(json!({"code": "apple"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data.");
}

#[tokio::test]
async fn deleting_a_company_twice_is_not_found() {
    let (app, _) = build_app();
    send(&app, "POST", "/companies", Some(apple())).await;

    let (status, body) = send(&app, "DELETE", "/companies/apple", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    let (status, body) = send(&app, "DELETE", "/companies/apple", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Company not found.");
}

#[tokio::test]
async fn empty_invoice_list_is_ok() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invoice_for_unknown_company_round_trips() {
    let (app, _) = build_app();
    let input = json!({
        "comp_code": "ghost",
        "amt": 200.0,
        "paid": true,
        "add_date": "2021-09-18T18:47:52.116Z",
        "paid_date": "2021-10-01T09:30:00Z"
    });
    let (status, body) = send(&app, "POST", "/invoices", Some(input.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"invoice": input.clone()}));

    let (status, body) = send(&app, "GET", "/invoices/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, input);

    let (_, body) = send(&app, "GET", "/invoices", None).await;
    assert_eq!(body, json!([input]));
}

#[tokio::test]
async fn invoice_create_validation() {
    let (app, _) = build_app();
    let mut missing = apple_invoice();
    missing.as_object_mut().unwrap().remove("amt");
    let (status, body) = send(&app, "POST", "/invoices", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add item.");

    let mut not_bool = apple_invoice();
    not_bool["paid"] = json!(3456);
    let (status, body) = send(&app, "POST", "/invoices", Some(not_bool)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Paid column must be true or false.");

    let mut null_string = apple_invoice();
    null_string["paid_date"] = json!("null");
    let (status, body) = send(&app, "POST", "/invoices", Some(null_string)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "paid_date must be a timestamp or null.");

    let (_, body) = send(&app, "GET", "/invoices", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invoice_update_flow() {
    let (app, _) = build_app();
    send(&app, "POST", "/invoices", Some(apple_invoice())).await;

    let mut updated = apple_invoice();
    updated["amt"] = json!(10000.0);
    updated["paid"] = json!(true);
    updated["paid_date"] = json!("2021-09-20T00:00:00Z");
    let (status, body) = send(&app, "PUT", "/invoices/1", Some(updated.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, updated);

    let (status, body) = send(&app, "PUT", "/invoices/15", Some(updated.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Invoice not found.");

    let mut cake = updated.clone();
    cake["paid"] = json!("cake");
    let (status, body) = send(&app, "PUT", "/invoices/1", Some(cake)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Paid column must be true or false.");

    let mut partial = updated;
    partial.as_object_mut().unwrap().remove("amt");
    let (status, body) = send(&app, "PUT", "/invoices/1", Some(partial)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "You must update every field to update item. Use same values on other columns if necessary"
    );
}

#[tokio::test]
async fn invoice_delete_and_lookup_errors() {
    let (app, _) = build_app();
    send(&app, "POST", "/invoices", Some(apple_invoice())).await;

    let (status, body) = send(&app, "DELETE", "/invoices/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    let (status, body) = send(&app, "DELETE", "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Invoice not found.");

    let (status, body) = send(&app, "GET", "/invoices/15", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Invoice not found.");

    let (status, body) = send(&app, "GET", "/invoices/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid invoice id");
}

#[tokio::test]
async fn industry_for_existing_company_is_linked_once() {
    let (app, store) = build_app();
    send(&app, "POST", "/companies", Some(apple())).await;

    let (status, body) = send(&app, "POST", "/industries", Some(json!({"code": "apple", "industry": "Big Tech"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"added": {"code": "apple", "industry": "Big Tech"}}));
    assert_eq!(store.company_industries("apple").await.unwrap().len(), 1);

    let (status, body) = send(&app, "POST", "/industries", Some(json!({"code": "pizza_hut", "industry": "Restaurants"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"added": {"code": "pizza_hut", "industry": "Restaurants"}}));
    assert!(store.company_industries("pizza_hut").await.unwrap().is_empty());
}

#[tokio::test]
async fn industry_lookup_by_name() {
    let (app, _) = build_app();
    send(&app, "POST", "/industries", Some(json!({"code": "apple", "industry": "Computers"}))).await;

    let (status, body) = send(&app, "GET", "/industries/Computers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["apple"]));

    let (status, body) = send(&app, "GET", "/industries/carrot", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn industry_create_requires_both_fields() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/industries", Some(json!({"code": "john_deere"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add new industry.");
}

#[tokio::test]
async fn explicit_association_is_unchecked() {
    let (app, store) = build_app();
    let (status, body) = send(&app, "POST", "/industries/dunkin", Some(json!({"code": "dunkin", "id": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"added": {"code": "dunkin", "id": 10}}));
    let links = store.company_industries("dunkin").await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].industry_id, 10);

    let (status, body) = send(&app, "POST", "/industries/dunkin", Some(json!({"code": "dunkin"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add association.");
}

#[tokio::test]
async fn unmatched_route_is_not_found() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/invoice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": {"message": "Not Found", "status": 404}}));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = build_app();
    let req = Request::builder()
        .method("POST")
        .uri("/companies")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/companies", Some(json!(["apple"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn send_raw(app: &Router, payload: Vec<u8>, content_length: bool) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/companies")
        .header(header::CONTENT_TYPE, "application/json");
    if content_length {
        builder = builder.header(header::CONTENT_LENGTH, payload.len());
    }
    let resp = app.clone().call(builder.body(Body::from(payload)).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn oversized_body_is_rejected_in_the_error_envelope() {
    let app = app_with_body_limit(AppState::new(MemoryStore::new()), 16);
    let payload = serde_json::to_vec(&apple()).unwrap();
    let expected = json!({"error": {"message": "Request body too large.", "status": 413}});

    let (status, body) = send_raw(&app, payload.clone(), true).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, expected);

    let (status, body) = send_raw(&app, payload, false).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn unsupported_method_is_not_found() {
    let (app, _) = build_app();
    for (method, uri) in [("PATCH", "/companies"), ("DELETE", "/industries"), ("POST", "/invoices/1")] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body, json!({"error": {"message": "Not Found", "status": 404}}));
    }
}

#[tokio::test]
async fn blank_paid_date_is_missing_data() {
    let (app, _) = build_app();
    let mut blank = apple_invoice();
    blank["paid_date"] = json!("");
    let (status, body) = send(&app, "POST", "/invoices", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Not enough data to add item.");
}

#[tokio::test]
async fn health_and_readiness() {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "database": "ok"}));

    let (_, body) = send(&app, "GET", "/version", None).await;
    assert_eq!(body["name"], "biztime");
}
