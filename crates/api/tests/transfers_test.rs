//! Router tests for bookings: balance upkeep on edits, filters, deletes and export.

mod common;

use axum::http::{StatusCode, header::CONTENT_DISPOSITION, header::CONTENT_TYPE};
use common::{TestApp, body_bytes, delete, get, money, post_json, put_json};
use rust_decimal::Decimal;
use safar_db::entities::sea_orm_active_enums::UserRole;
use serde_json::{Value, json};

async fn create_customer(app: &TestApp, token: &str, name: &str) -> String {
    let (status, body) = app
        .call(post_json(
            "/api/customers",
            Some(token),
            &json!({"name": name, "phone": "0100"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_air_comp(app: &TestApp, token: &str, name: &str) -> String {
    let (status, body) = app
        .call(post_json("/api/airComp", Some(token), &json!({"name": name})))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_transfer(app: &TestApp, token: &str, body: &Value) -> Value {
    let (status, body) = app.call(post_json("/api/transfers", Some(token), body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

async fn pay(app: &TestApp, token: &str, transfer_id: &str, amount: u32) -> (StatusCode, Value) {
    app.call(post_json(
        "/api/payments",
        Some(token),
        &json!({"transfer_id": transfer_id, "amount": amount, "method": "cash"}),
    ))
    .await
}

fn assert_balance(transfer: &Value, price: u32, paid: u32, status: &str) {
    assert_eq!(money(&transfer["ticket_price"]), Decimal::from(price), "{transfer}");
    assert_eq!(money(&transfer["total_paid"]), Decimal::from(paid), "{transfer}");
    assert_eq!(
        money(&transfer["remaining_amount"]),
        Decimal::from(price - paid),
        "{transfer}"
    );
    assert_eq!(transfer["status"], status, "{transfer}");
}

#[tokio::test]
async fn test_new_transfer_starts_unpaid() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let customer = create_customer(&app, &token, "Yasmin Fathy").await;

    let transfer = create_transfer(
        &app,
        &token,
        &json!({
            "booking_number": " BK-100 ",
            "customer_id": customer,
            "ticket_cost": 850,
            "ticket_price": 1000,
            "status": "paid",
        }),
    )
    .await;

    assert_eq!(transfer["booking_number"], "BK-100");
    assert_eq!(transfer["customer"]["name"], "Yasmin Fathy");
    assert!(transfer["air_comp"].is_null());
    assert_balance(&transfer, 1000, 0, "unpaid");
}

#[tokio::test]
async fn test_create_rejects_bad_references() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let customer = create_customer(&app, &token, "Omar").await;
    create_transfer(
        &app,
        &token,
        &json!({"booking_number": "BK-1", "customer_id": customer, "ticket_price": 500}),
    )
    .await;

    let (status, body) = app
        .call(post_json(
            "/api/transfers",
            Some(&token),
            &json!({"booking_number": "BK-1", "customer_id": customer, "ticket_price": 500}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Booking number 'BK-1' already exists");

    let (status, body) = app
        .call(post_json(
            "/api/transfers",
            Some(&token),
            &json!({
                "booking_number": "BK-2",
                "customer_id": uuid::Uuid::new_v4(),
                "ticket_price": 500,
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Customer not found");

    let (status, body) = app
        .call(post_json(
            "/api/transfers",
            Some(&token),
            &json!({"booking_number": "BK-3", "customer_id": customer, "ticket_price": -1}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Ticket price cannot be negative");
}

#[tokio::test]
async fn test_price_change_recomputes_balance_from_payments() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let customer = create_customer(&app, &token, "Huda").await;
    let transfer = create_transfer(
        &app,
        &token,
        &json!({"booking_number": "BK-7", "customer_id": customer, "ticket_price": 1000}),
    )
    .await;
    let id = transfer["id"].as_str().unwrap().to_string();
    let uri = format!("/api/transfers/{id}");

    let (status, body) = pay(&app, &token, &id, 400).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"ticket_price": 800})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_balance(&body["data"], 800, 400, "partial");

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"ticket_price": 300})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Ticket price cannot be less than the amount already paid"
    );

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"ticket_price": 400})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_balance(&body["data"], 400, 400, "paid");

    // Edits that leave the price alone still carry the stored payments.
    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"route": "CAI-RUH"})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["route"], "CAI-RUH");
    assert_balance(&body["data"], 400, 400, "paid");
}

#[tokio::test]
async fn test_null_clears_air_company_and_departure() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let customer = create_customer(&app, &token, "Karim").await;
    let air_comp = create_air_comp(&app, &token, "Nile Air").await;
    let transfer = create_transfer(
        &app,
        &token,
        &json!({
            "booking_number": "BK-9",
            "customer_id": customer,
            "air_comp_id": air_comp,
            "take_off_date": "2026-03-01T10:00:00+02:00",
            "ticket_price": 700,
        }),
    )
    .await;
    assert_eq!(transfer["air_comp"]["name"], "Nile Air");
    let uri = format!("/api/transfers/{}", transfer["id"].as_str().unwrap());

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"notes": "window seat"})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["air_comp_id"], air_comp.as_str());
    assert!(!body["data"]["take_off_date"].is_null());

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"air_comp_id": null})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["air_comp_id"].is_null());
    assert!(body["data"]["air_comp"].is_null());
    assert!(!body["data"]["take_off_date"].is_null());

    let (status, body) = app
        .call(put_json(&uri, Some(&token), &json!({"take_off_date": null})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["take_off_date"].is_null());
    assert_eq!(body["data"]["notes"], "window seat");
}

#[tokio::test]
async fn test_list_filters_and_blank_filter_values() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let first = create_customer(&app, &token, "Mariam").await;
    let second = create_customer(&app, &token, "Tarek").await;
    let air_comp = create_air_comp(&app, &token, "Saudia").await;

    let paid = create_transfer(
        &app,
        &token,
        &json!({
            "booking_number": "SV_201",
            "customer_id": first,
            "air_comp_id": air_comp,
            "ticket_price": 300,
        }),
    )
    .await;
    create_transfer(
        &app,
        &token,
        &json!({"booking_number": "SVX201", "customer_id": second, "ticket_price": 900}),
    )
    .await;
    let (status, _) = pay(&app, &token, paid["id"].as_str().unwrap(), 300).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(get(
            "/api/transfers?status=&customer=&air_comp=&booking_number=",
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = app
        .call(get("/api/transfers?status=paid", Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["booking_number"], "SV_201");

    let (_, body) = app
        .call(get(&format!("/api/transfers?customer={second}"), Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["customer"]["name"], "Tarek");

    let (_, body) = app
        .call(get(&format!("/api/transfers?air_comp={air_comp}"), Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = app
        .call(get("/api/transfers?booking_number=sv_", Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["booking_number"], "SV_201");

    let (status, _) = app
        .call(get("/api/transfers?status=refunded", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deletes_refuse_dependent_records() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let (_, admin) = app.user_token(UserRole::Admin).await;
    let customer = create_customer(&app, &token, "Salma").await;
    let transfer = create_transfer(
        &app,
        &token,
        &json!({"booking_number": "BK-55", "customer_id": customer, "ticket_price": 600}),
    )
    .await;
    let id = transfer["id"].as_str().unwrap().to_string();
    let (status, payment) = pay(&app, &token, &id, 100).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(delete(&format!("/api/customers/{customer}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete customer with 1 existing transfers"
    );

    let (status, body) = app
        .call(delete(&format!("/api/transfers/{id}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete transfer with 1 recorded payments"
    );

    let payment_id = payment["data"]["id"].as_str().unwrap();
    let (status, _) = app
        .call(delete(&format!("/api/payments/{payment_id}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(delete(&format!("/api/transfers/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, body) = app
        .call(delete(&format!("/api/transfers/{id}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Transfer deleted");

    let (status, _) = app
        .call(delete(&format!("/api/customers/{customer}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_transfer_export_is_xlsx() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let customer = create_customer(&app, &token, "Adel").await;
    create_transfer(
        &app,
        &token,
        &json!({"booking_number": "BK-X", "customer_id": customer, "ticket_price": 450}),
    )
    .await;

    let response = app
        .send(get("/api/transfers/export/excel?status=", Some(&token)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"transfers.xlsx\""
    );
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
}
