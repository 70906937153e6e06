//! Router tests for customer CRUD, listing and export.

mod common;

use axum::http::{StatusCode, header::CONTENT_DISPOSITION, header::CONTENT_TYPE};
use common::{TestApp, body_bytes, delete, get, post_json, put_json};
use safar_db::entities::sea_orm_active_enums::UserRole;
use serde_json::{Value, json};

async fn create_customer(app: &TestApp, token: &str, name: &str, phone: &str) -> Value {
    let (status, body) = app
        .call(post_json(
            "/api/customers",
            Some(token),
            &json!({"name": name, "phone": phone, "nationality": "Egyptian"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_customer_crud_flow() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    let (_, admin) = app.user_token(UserRole::Admin).await;

    let created = create_customer(&app, &token, "  Ahmed Ali ", "0100").await;
    assert_eq!(created["name"], "Ahmed Ali");
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/customers/{id}");

    let (status, body) = app.call(get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone"], "0100");

    let (status, body) = app
        .call(put_json(
            &uri,
            Some(&token),
            &json!({"phone": "0111", "nationality": ""}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "0111");
    assert!(body["data"]["nationality"].is_null());

    let (status, body) = app.call(delete(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized, admin access required");

    let (status, _) = app.call(delete(&uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call(get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn test_customer_validation() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;

    let (status, body) = app
        .call(post_json(
            "/api/customers",
            Some(&token),
            &json!({"name": "", "phone": "0100"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Customer name is required");

    let (status, body) = app
        .call(post_json(
            "/api/customers",
            Some(&token),
            &json!({"name": "Ali", "phone": "0100", "email": "nope"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a valid email");

    let (status, _) = app
        .call(get("/api/customers/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_list_envelope_and_filters() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;

    for (name, phone) in [("Ahmed Saleh", "0101"), ("Mona Adel", "0102"), ("ahmed Fathy", "0103")] {
        create_customer(&app, &token, name, phone).await;
    }

    let (status, body) = app
        .call(get("/api/customers?page=1&limit=2", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["pagination"],
        json!({"total": 3, "page": 1, "limit": 2, "pages": 2})
    );

    let (_, body) = app
        .call(get("/api/customers?name=AHMED", Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 2);

    // unparsable dates are ignored rather than rejected
    let (status, body) = app
        .call(get("/api/customers?createdAt=2024/13/45", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);

    let (_, body) = app
        .call(get("/api/customers?createdAt=01/01/2001", Some(&token)))
        .await;
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["pages"], 1);
}

#[tokio::test]
async fn test_customer_export_is_xlsx() {
    let app = TestApp::new().await;
    let (_, token) = app.user_token(UserRole::Employee).await;
    create_customer(&app, &token, "Hassan", "0100").await;

    let response = app
        .send(get("/api/customers/export/excel", Some(&token)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"customers.xlsx\""
    );
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
}
