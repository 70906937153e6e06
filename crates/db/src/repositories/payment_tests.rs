//! Payment reconciliation tests against a mocked Postgres connection.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};

use super::*;
use crate::entities::sea_orm_active_enums::TransferStatus;

fn transfer(price: Decimal, paid: Decimal) -> transfers::Model {
    let now = chrono::Utc::now().fixed_offset();
    transfers::Model {
        id: Uuid::new_v4(),
        booking_number: "BK-1001".to_string(),
        customer_id: Uuid::new_v4(),
        air_comp_id: None,
        route: Some("CAI-JED".to_string()),
        airport: None,
        country: Some("Saudi Arabia".to_string()),
        take_off_date: None,
        ticket_cost: price - dec!(150),
        ticket_price: price,
        status: TransferStatus::Unpaid,
        total_paid: paid,
        remaining_amount: price - paid,
        notes: None,
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn paid_row(total: Option<Decimal>) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("total", Value::from(total))])
}

fn input(transfer_id: Uuid, amount: Decimal) -> CreatePaymentInput {
    CreatePaymentInput {
        transfer_id,
        amount,
        payment_date: chrono::Utc::now().fixed_offset(),
        method: PaymentMethod::Cash,
        receipt_number: Some("R-77".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_rejects_overpayment() {
    let booking = transfer(dec!(1000), dec!(600));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking.clone()]])
        .append_query_results([vec![paid_row(Some(dec!(600)))]])
        .into_connection();

    let result = PaymentRepository::new(db)
        .create(input(booking.id, dec!(500)), Uuid::new_v4())
        .await;

    match result {
        Err(PaymentError::Balance(BalanceError::Overpaid { remaining })) => {
            assert_eq!(remaining, dec!(400));
        }
        other => panic!("expected overpayment error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_rejects_zero_amount() {
    let booking = transfer(dec!(1000), dec!(0));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking.clone()]])
        .append_query_results([vec![paid_row(None)]])
        .into_connection();

    let result = PaymentRepository::new(db)
        .create(input(booking.id, dec!(0)), Uuid::new_v4())
        .await;

    assert!(matches!(
        result,
        Err(PaymentError::Balance(BalanceError::NonPositivePayment))
    ));
}

#[tokio::test]
async fn test_create_for_unknown_transfer() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transfers::Model>::new()])
        .into_connection();

    let missing = Uuid::new_v4();
    let result = PaymentRepository::new(db)
        .create(input(missing, dec!(100)), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(PaymentError::TransferNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_create_marks_transfer_partial() {
    let booking = transfer(dec!(1000), dec!(0));
    let now = chrono::Utc::now().fixed_offset();
    let stored = payments::Model {
        id: Uuid::new_v4(),
        transfer_id: booking.id,
        amount: dec!(400),
        payment_date: now,
        method: PaymentMethod::Cash,
        receipt_number: Some("R-77".to_string()),
        notes: None,
        created_by: None,
        created_at: now,
        updated_at: now,
    };
    let updated = transfers::Model {
        status: TransferStatus::Partial,
        total_paid: dec!(400),
        remaining_amount: dec!(600),
        ..booking.clone()
    };

    let db: DatabaseConnection = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking.clone()]])
        .append_query_results([vec![paid_row(None)]])
        .append_query_results([vec![stored.clone()]])
        .append_query_results([vec![updated]])
        .into_connection();

    let payment = PaymentRepository::new(db.clone())
        .create(input(booking.id, dec!(400)), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(payment.amount, dec!(400));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("partial"), "{log}");
    assert!(log.contains("FOR UPDATE"), "{log}");
}

#[tokio::test]
async fn test_delete_unknown_payment() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<payments::Model>::new()])
        .into_connection();

    let result = PaymentRepository::new(db)
        .delete(Uuid::new_v4(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(PaymentError::NotFound(_))));
}
