//! Integration tests for the air company repository.

mod common;

use safar_db::{
    AirCompRepository,
    repositories::{AirCompError, AirCompFilter, AirCompInput},
};
use safar_shared::PageRequest;

fn input(name: &str) -> AirCompInput {
    AirCompInput {
        name: name.to_string(),
        phone: None,
        address: None,
    }
}

#[tokio::test]
async fn test_air_comp_crud() {
    let db = common::setup_db().await;
    let repo = AirCompRepository::new(db);

    let created = repo.create(input("EgyptAir")).await.unwrap();
    let updated = repo
        .update(
            created.id,
            AirCompInput {
                name: "EgyptAir".to_string(),
                phone: Some("1717".to_string()),
                address: Some("Cairo Airport".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("1717"));

    repo.delete(created.id).await.unwrap();
    assert!(matches!(
        repo.find_by_id(created.id).await,
        Err(AirCompError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete(created.id).await,
        Err(AirCompError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_name_filter_is_case_insensitive() {
    let db = common::setup_db().await;
    let repo = AirCompRepository::new(db);

    for name in ["Saudia", "flynas", "Flydubai"] {
        repo.create(input(name)).await.unwrap();
    }

    let filter = AirCompFilter {
        name: Some("FLY".to_string()),
    };
    let (items, total) = repo.list(&filter, PageRequest::default()).await.unwrap();

    assert_eq!(total, 2);
    assert!(items.iter().all(|a| a.name.to_lowercase().starts_with("fly")));
    assert_eq!(repo.count().await.unwrap(), 3);
}
