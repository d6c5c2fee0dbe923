//! Batch entity: a tracked lot of a harvested crop

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub batch_id: String,
    pub quantity: f64,
    pub unit: String,
    /// ISO date (YYYY-MM-DD)
    pub harvest_date: String,
    pub storage_location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crop::Entity")]
    Crop,
    #[sea_orm(has_many = "super::nutritional_analysis::Entity")]
    NutritionalAnalysis,
    #[sea_orm(has_many = "super::spoilage_control::Entity")]
    SpoilageControl,
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crop.def()
    }
}

impl Related<super::nutritional_analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NutritionalAnalysis.def()
    }
}

impl Related<super::spoilage_control::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpoilageControl.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
