//! Shipment-to-vehicle assignment entity
//!
//! A vehicle referenced here cannot be deleted (`ON DELETE RESTRICT`).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shipment_transport")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub shipment_transport_id: i32,
    pub shipment_id: String,
    pub vehicle_id: String,
    pub assigned_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transport_vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::transport_vehicle::Column::VehicleId",
        on_delete = "Restrict"
    )]
    Vehicle,
}

impl Related<super::transport_vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
