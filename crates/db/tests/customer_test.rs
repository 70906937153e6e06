//! Integration tests for the customer repository.

mod common;

use std::collections::BTreeMap;

use safar_db::{
    CustomerRepository,
    entities::customers,
    repositories::{CreateCustomerInput, CustomerError, CustomerFilter, UpdateCustomerInput},
};
use safar_shared::PageRequest;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

fn input(name: &str, phone: &str, nationality: Option<&str>) -> CreateCustomerInput {
    CreateCustomerInput {
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        national_id: None,
        passport_number: None,
        nationality: nationality.map(str::to_string),
        address: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_customer_crud() {
    let db = common::setup_db().await;
    let user = common::create_user(&db).await;
    let repo = CustomerRepository::new(db);

    let created = repo
        .create(input("Khaled Omar", "01001234567", Some("Egyptian")), user.id)
        .await
        .unwrap();
    assert_eq!(created.created_by, Some(user.id));

    let updated = repo
        .update(
            created.id,
            UpdateCustomerInput {
                phone: Some("01111111111".to_string()),
                passport_number: Some(Some("A1234567".to_string())),
                nationality: Some(None),
                ..Default::default()
            },
            user.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Khaled Omar");
    assert_eq!(updated.phone, "01111111111");
    assert_eq!(updated.passport_number.as_deref(), Some("A1234567"));
    assert_eq!(updated.nationality, None);

    repo.delete(created.id).await.unwrap();
    assert!(matches!(
        repo.find_by_id(created.id).await,
        Err(CustomerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let db = common::setup_db().await;
    let user = common::create_user(&db).await;
    let repo = CustomerRepository::new(db);

    for i in 0..12 {
        repo.create(input(&format!("Traveller {i}"), "0100", None), user.id)
            .await
            .unwrap();
    }
    repo.create(input("Samir Hassan", "0122", Some("Sudanese")), user.id)
        .await
        .unwrap();

    let (page, total) = repo
        .list(&CustomerFilter::default(), PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(total, 13);
    assert_eq!(page.len(), 3);

    let filter = CustomerFilter {
        name: Some("samir".to_string()),
        ..Default::default()
    };
    let (found, total) = repo.list(&filter, PageRequest::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].name, "Samir Hassan");

    let filter = CustomerFilter {
        phone: Some("0122".to_string()),
        nationality: Some("sudan".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.list_all(&filter).await.unwrap().len(), 1);
    assert_eq!(repo.count().await.unwrap(), 13);
}

#[tokio::test]
async fn test_name_filter_matches_wildcards_literally() {
    let db = common::setup_db().await;
    let user = common::create_user(&db).await;
    let repo = CustomerRepository::new(db);

    for name in ["Ali_Hassan", "AliXHassan", "Ali 100% Travel"] {
        repo.create(input(name, "0100", None), user.id)
            .await
            .unwrap();
    }

    let by_name = |name: &str| CustomerFilter {
        name: Some(name.to_string()),
        ..Default::default()
    };

    let found = repo.list_all(&by_name("ali_")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ali_Hassan");

    let found = repo.list_all(&by_name("100%")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ali 100% Travel");

    assert_eq!(repo.list_all(&by_name("%")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_unknown_customer() {
    let db = common::setup_db().await;
    let result = CustomerRepository::new(db)
        .update(Uuid::new_v4(), UpdateCustomerInput::default(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(CustomerError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_blocked_by_transfers() {
    let now = chrono::Utc::now().fixed_offset();
    let customer = customers::Model {
        id: Uuid::new_v4(),
        name: "Nour".to_string(),
        phone: "0100".to_string(),
        email: None,
        national_id: None,
        passport_number: None,
        nationality: None,
        address: None,
        notes: None,
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![customer.clone()]])
        .append_query_results([vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(2)),
        )])]])
        .into_connection();

    let result = CustomerRepository::new(db).delete(customer.id).await;

    assert!(matches!(result, Err(CustomerError::HasTransfers(2))));
}
