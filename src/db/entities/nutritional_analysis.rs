//! Nutritional analysis entity
//!
//! Rows are only ever inserted by the analysis entry form; nothing in the
//! application updates or deletes them.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "nutritional_analysis")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub analysis_id: String,
    pub batch_id: String,
    pub calories: f64,
    pub protein: f64,
    /// Free text, e.g. "A,C"
    pub vitamins: String,
    /// Free text, e.g. "Iron,Zinc"
    pub minerals: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    /// User who entered the analysis
    pub created_by: Option<i32>,
    pub created_at: i64,
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
