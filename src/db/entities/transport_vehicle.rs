//! Transport vehicle entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transport_vehicle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vehicle_id: String,
    pub vehicle_type: String,
    #[sea_orm(unique)]
    pub license_plate_number: String,
    /// Load capacity in tonnes
    pub capacity: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shipment_transport::Entity")]
    ShipmentTransport,
}

impl Related<super::shipment_transport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentTransport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
