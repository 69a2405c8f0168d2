mod common;

use axum::http::{Method, StatusCode};
use common::{spec_invoice_body, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

fn dec_field(data: &Value, field: &str) -> Decimal {
    let raw = data
        .get(field)
        .unwrap_or_else(|| panic!("missing field {field}: {data}"));
    match raw {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("field {field} is not numeric: {other}"),
    }
}

/// Create an invoice as `issuer` and return its data object
async fn create_invoice(app: &TestApp, issuer: Uuid, body: Value) -> Value {
    let token = app.token_for(issuer, &[]);
    let (status, response) = app
        .request(Method::POST, "/api/v1/invoices", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {response}");
    response["data"].clone()
}

/// Transition a draft invoice to sent
async fn mark_sent(app: &TestApp, issuer: Uuid, invoice_id: &str) {
    let token = app.token_for(issuer, &[]);
    let (status, response) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&token),
            Some(json!({"status": "sent"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "mark sent failed: {response}");
}

async fn fetch_invoice(app: &TestApp, caller: Uuid, invoice_id: &str) -> Value {
    let token = app.token_for(caller, &[]);
    let (status, response) = app
        .request(
            Method::GET,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "fetch failed: {response}");
    response["data"].clone()
}

#[tokio::test]
async fn invoice_creation_computes_spec_totals() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;

    assert_eq!(dec_field(&invoice, "subtotal"), dec!(100));
    assert_eq!(dec_field(&invoice, "tax_amount"), dec!(10));
    assert_eq!(dec_field(&invoice, "total_amount"), dec!(110));
    assert_eq!(dec_field(&invoice, "amount_paid"), dec!(0));
    assert_eq!(dec_field(&invoice, "amount_due"), dec!(110));
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["payment_status"], "unpaid");
    assert!(invoice["paid_date"].is_null());

    let items = invoice["line_items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["position"], 0);
    assert_eq!(dec_field(&items[0], "total_amount"), dec!(100));
}

#[tokio::test]
async fn invoice_numbers_follow_per_type_sequences() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let first = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let second = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    assert_eq!(first["invoice_number"], "RNT-000001");
    assert_eq!(second["invoice_number"], "RNT-000002");

    let mut operational = spec_invoice_body(payer);
    operational["invoice_type"] = json!("operational");
    let third = create_invoice(&app, issuer, operational).await;
    assert_eq!(third["invoice_number"], "OPS-000001");
}

#[tokio::test]
async fn full_payment_settles_the_invoice() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (status, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "bank_transfer",
                "amount": "110"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "payment failed: {response}");
    assert_eq!(response["data"]["status"], "completed");
    assert_eq!(response["data"]["payer_id"], json!(payer));

    let settled = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&settled, "amount_paid"), dec!(110));
    assert_eq!(dec_field(&settled, "amount_due"), dec!(0));
    assert_eq!(settled["payment_status"], "paid");
    assert_eq!(settled["status"], "paid");
    assert!(!settled["paid_date"].is_null());
}

#[tokio::test]
async fn partial_payment_then_full_refund() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (status, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "stripe",
                "amount": "60"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    let partial = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&partial, "amount_paid"), dec!(60));
    assert_eq!(dec_field(&partial, "amount_due"), dec!(50));
    assert_eq!(partial["payment_status"], "partial");
    assert_eq!(partial["status"], "sent");

    // Issuer reverses the payment in full
    let issuer_token = app.token_for(issuer, &[]);
    let (status, response) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{payment_id}/refund"),
            Some(&issuer_token),
            Some(json!({"reason": "Guest cancelled", "refund_amount": "60"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "refund failed: {response}");
    assert_eq!(response["data"]["payment"]["status"], "refunded");
    assert_eq!(dec_field(&response["data"], "refund_amount"), dec!(60));
    let metadata = &response["data"]["payment"]["metadata"];
    assert_eq!(metadata["refund_reason"], "Guest cancelled");
    assert_eq!(metadata["refunded_by"], json!(issuer));

    let refunded = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&refunded, "amount_paid"), dec!(0));
    assert_eq!(dec_field(&refunded, "amount_due"), dec!(110));
    assert_eq!(refunded["payment_status"], "refunded");
    assert_eq!(refunded["status"], "refunded");
}

#[tokio::test]
async fn partial_refund_leaves_invoice_partial() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (_, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "paypal",
                "amount": "110"
            })),
        )
        .await;
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    let issuer_token = app.token_for(issuer, &[]);
    let (status, response) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{payment_id}/refund"),
            Some(&issuer_token),
            Some(json!({"refund_amount": "50"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "refund failed: {response}");

    // The payment record is inert after any refund, even a partial one
    assert_eq!(response["data"]["payment"]["status"], "refunded");

    let after = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&after, "amount_paid"), dec!(60));
    assert_eq!(dec_field(&after, "amount_due"), dec!(50));
    assert_eq!(after["payment_status"], "partial");
    assert_eq!(after["status"], "sent");
    assert!(after["paid_date"].is_null());
}

#[tokio::test]
async fn over_payment_is_rejected_without_state_change() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let mut body = spec_invoice_body(payer);
    body["line_items"] = json!([
        {"description": "Cleaning fee", "quantity": "1", "unit_price": "50"}
    ]);
    body["tax_rate"] = json!("0");
    let invoice = create_invoice(&app, issuer, body).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    assert_eq!(dec_field(&invoice, "amount_due"), dec!(50));
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "cash",
                "amount": "75"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No payment row, no aggregate mutation
    let unchanged = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&unchanged, "amount_paid"), dec!(0));
    assert_eq!(unchanged["payment_status"], "unpaid");

    let issuer_token = app.token_for(issuer, &[]);
    let (status, response) = app
        .request(
            Method::GET,
            &format!("/api/v1/invoices/{invoice_id}/payments"),
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn paying_a_settled_invoice_is_rejected() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let pay = |amount: &str| {
        app.request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "check",
                "amount": amount
            })),
        )
    };

    let (status, _) = pay("110").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = pay("10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_billed_party_may_pay() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let stranger_token = app.token_for(stranger, &[]);
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&stranger_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "cash",
                "amount": "10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_the_issuer_may_refund() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (_, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "stripe",
                "amount": "60"
            })),
        )
        .await;
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    // The payer cannot self-refund
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{payment_id}/refund"),
            Some(&payer_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn double_refund_is_rejected() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (_, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "stripe",
                "amount": "60"
            })),
        )
        .await;
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    let issuer_token = app.token_for(issuer, &[]);
    let refund_path = format!("/api/v1/payments/{payment_id}/refund");
    let refund = || {
        app.request(
            Method::POST,
            &refund_path,
            Some(&issuer_token),
            Some(json!({"refund_amount": "30"})),
        )
    };

    let (status, _) = refund().await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = refund().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Aggregates reflect exactly one refund
    let after = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&after, "amount_paid"), dec!(30));
}

#[tokio::test]
async fn refund_exceeding_original_payment_is_rejected() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (_, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "stripe",
                "amount": "60"
            })),
        )
        .await;
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    let issuer_token = app.token_for(issuer, &[]);
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{payment_id}/refund"),
            Some(&issuer_token),
            Some(json!({"refund_amount": "75"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Payment and invoice are untouched
    let (_, payment) = app
        .request(
            Method::GET,
            &format!("/api/v1/payments/{payment_id}"),
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(payment["data"]["status"], "completed");

    let after = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(dec_field(&after, "amount_paid"), dec!(60));
    assert_eq!(after["payment_status"], "partial");
}

#[tokio::test]
async fn non_draft_invoices_reject_edits_except_pure_cancellation() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let issuer_token = app.token_for(issuer, &[]);

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    // Financial edits on a sent invoice fail
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&issuer_token),
            Some(json!({"tax_rate": "20"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Cancellation bundled with other edits fails before any mutation
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&issuer_token),
            Some(json!({"status": "cancelled", "tax_rate": "20"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let unchanged = fetch_invoice(&app, issuer, &invoice_id).await;
    assert_eq!(unchanged["status"], "sent");
    assert_eq!(dec_field(&unchanged, "tax_rate"), dec!(10));

    // Pure cancellation of a sent invoice succeeds
    let (status, response) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&issuer_token),
            Some(json!({"status": "cancelled"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["status"], "cancelled");

    // Cancelled invoices cannot transition again
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&issuer_token),
            Some(json!({"status": "cancelled"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn draft_line_item_replacement_recomputes_totals() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let issuer_token = app.token_for(issuer, &[]);

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    let (status, response) = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{invoice_id}"),
            Some(&issuer_token),
            Some(json!({
                "line_items": [
                    {"description": "One night", "quantity": "1", "unit_price": "80"},
                    {"description": "Cleaning", "quantity": "1", "unit_price": "20"}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "replace failed: {response}");

    let data = &response["data"];
    assert_eq!(dec_field(data, "subtotal"), dec!(100));
    assert_eq!(dec_field(data, "tax_amount"), dec!(10));
    assert_eq!(dec_field(data, "total_amount"), dec!(110));

    let items = data["line_items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["position"], 0);
    assert_eq!(items[1]["position"], 1);
}

#[tokio::test]
async fn delete_is_draft_only() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let issuer_token = app.token_for(issuer, &[]);

    let draft = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let draft_id = draft["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/invoices/{draft_id}"),
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/invoices/{draft_id}"),
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A sent invoice must be cancelled, not deleted
    let sent = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let sent_id = sent["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &sent_id).await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/invoices/{sent_id}"),
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_scoping_by_role_and_party() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let admin = Uuid::new_v4();

    let property_id = app.seed_property(owner, "Driftwood Cottage").await;

    let mut body = spec_invoice_body(payer);
    body["property_id"] = json!(property_id);
    create_invoice(&app, issuer, body).await;

    async fn count_for(app: &TestApp, token: String) -> usize {
        let (status, response) = app
            .request(Method::GET, "/api/v1/invoices", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK, "list failed: {response}");
        response["data"]["items"].as_array().unwrap().len()
    }

    assert_eq!(count_for(&app, app.token_for(issuer, &[])).await, 1);
    assert_eq!(count_for(&app, app.token_for(payer, &[])).await, 1);
    assert_eq!(count_for(&app, app.token_for(owner, &["owner"])).await, 1);
    assert_eq!(count_for(&app, app.admin_token(admin)).await, 1);
    assert_eq!(count_for(&app, app.token_for(stranger, &[])).await, 0);
}

#[tokio::test]
async fn list_filters_by_type_and_status() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let issuer_token = app.token_for(issuer, &[]);

    create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let mut operational = spec_invoice_body(payer);
    operational["invoice_type"] = json!("operational");
    let second = create_invoice(&app, issuer, operational).await;
    mark_sent(&app, issuer, second["id"].as_str().unwrap()).await;

    let (status, response) = app
        .request(
            Method::GET,
            "/api/v1/invoices?invoice_type=operational",
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["items"].as_array().unwrap().len(), 1);

    let (status, response) = app
        .request(
            Method::GET,
            "/api/v1/invoices?status=draft",
            Some(&issuer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = response["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["invoice_type"], "rental");
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();
    let token = app.token_for(issuer, &[]);

    // Empty line items
    let mut body = spec_invoice_body(payer);
    body["line_items"] = json!([]);
    let (status, _) = app
        .request(Method::POST, "/api/v1/invoices", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown invoice type
    let mut body = spec_invoice_body(payer);
    body["invoice_type"] = json!("subscription");
    let (status, _) = app
        .request(Method::POST, "/api/v1/invoices", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown payment method
    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let payer_token = app.token_for(payer, &[]);
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice["id"],
                "payment_method": "credit_card",
                "amount": "10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Currency mismatch with the invoice
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice["id"],
                "payment_method": "cash",
                "amount": "10",
                "currency": "EUR"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(Method::GET, "/api/v1/invoices", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/invoices",
            Some("not-a-real-token"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_invoice_and_payment_are_not_found() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let token = app.token_for(user, &[]);
    let missing = Uuid::new_v4();

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/invoices/{missing}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&token),
            Some(json!({
                "invoice_id": missing,
                "payment_method": "cash",
                "amount": "10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{missing}/refund"),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ledger_records_income_and_refund_entries() {
    use rentora_api::entities::financial_transaction::{self, TransactionType};
    use sea_orm::EntityTrait;

    let app = TestApp::new().await;
    let issuer = Uuid::new_v4();
    let payer = Uuid::new_v4();

    let invoice = create_invoice(&app, issuer, spec_invoice_body(payer)).await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    mark_sent(&app, issuer, &invoice_id).await;

    let payer_token = app.token_for(payer, &[]);
    let (_, response) = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(&payer_token),
            Some(json!({
                "invoice_id": invoice_id.as_str(),
                "payment_method": "stripe",
                "amount": "60"
            })),
        )
        .await;
    let payment_id = response["data"]["id"].as_str().unwrap().to_string();

    let issuer_token = app.token_for(issuer, &[]);
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/payments/{payment_id}/refund"),
            Some(&issuer_token),
            Some(json!({"refund_amount": "60"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = financial_transaction::Entity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);

    let income = entries
        .iter()
        .find(|e| e.transaction_type == TransactionType::Income)
        .expect("income entry");
    let refund = entries
        .iter()
        .find(|e| e.transaction_type == TransactionType::Refund)
        .expect("refund entry");

    // Income flows payer -> issuer; the refund reverses direction
    assert_eq!(income.from_user_id, payer);
    assert_eq!(income.to_user_id, issuer);
    assert_eq!(refund.from_user_id, issuer);
    assert_eq!(refund.to_user_id, payer);
    assert_eq!(income.amount, refund.amount);
    assert_eq!(income.signed_amount() + refund.signed_amount(), dec!(0));
    let payment_uuid: Uuid = payment_id.parse().unwrap();
    assert_eq!(income.source_id, payment_uuid);
    assert_eq!(refund.source_id, payment_uuid);
}
