//! Crop entity, joined 1:1 with its batch on `batch_id`

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crop")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub crop_id: i32,
    pub batch_id: String,
    pub crop_name: String,
    pub crop_type: String,
    pub crop_variety: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::BatchId"
    )]
    Batch,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
