//! `SeaORM` Entity for transfers (ticket bookings) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransferStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub booking_number: String,
    pub customer_id: Uuid,
    pub air_comp_id: Option<Uuid>,
    pub route: Option<String>,
    pub airport: Option<String>,
    pub country: Option<String>,
    pub take_off_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub ticket_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub ticket_price: Decimal,
    pub status: TransferStatus,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub remaining_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::air_companies::Entity",
        from = "Column::AirCompId",
        to = "super::air_companies::Column::Id"
    )]
    AirCompanies,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::air_companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AirCompanies.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
