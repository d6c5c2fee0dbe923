//! Spoilage inspection entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "spoilage_control")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub spoilage_id: String,
    pub batch_id: String,
    /// User ID of the inspector
    pub inspected_by: i32,
    /// ISO date (YYYY-MM-DD)
    pub inspection_date: String,
    /// Percentage of the batch found spoiled (0-100)
    pub spoilage_level: f64,
    pub cause: Option<String>,
    pub action_taken: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::BatchId"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InspectedBy",
        to = "super::user::Column::Id"
    )]
    Inspector,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inspector.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
