use std::time::{SystemTime, UNIX_EPOCH};

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::Inventory;
use crate::dates;
use crate::db::entities::nutritional_analysis;
use crate::error::{Result, ServerError};
use crate::ids::IdGenerator;

/// A validated nutritional analysis submission
#[derive(Clone, Debug, PartialEq)]
pub struct NewAnalysis {
    pub batch_id: String,
    pub calories: f64,
    pub protein: f64,
    pub vitamins: String,
    pub minerals: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub created_by: Option<i32>,
}

impl NewAnalysis {
    /// Same calendar rule the form enforces in the browser, plus sign checks
    pub fn validate(&self) -> Result<()> {
        if self.calories < 0.0 {
            return Err(ServerError::InvalidRequest("Calories cannot be negative".to_string()));
        }
        if self.protein < 0.0 {
            return Err(ServerError::InvalidRequest("Protein cannot be negative".to_string()));
        }
        dates::validate_date(self.day, self.month, self.year).map_err(ServerError::InvalidRequest)
    }
}

impl Inventory<'_> {
    /// Insert an analysis under a freshly generated ID
    pub async fn add_nutritional_analysis(
        &self,
        ids: &IdGenerator,
        analysis: NewAnalysis,
    ) -> Result<nutritional_analysis::Model> {
        analysis.validate()?;

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let model = nutritional_analysis::ActiveModel {
            analysis_id: Set(ids.analysis_id()),
            batch_id: Set(analysis.batch_id),
            calories: Set(analysis.calories),
            protein: Set(analysis.protein),
            vitamins: Set(analysis.vitamins),
            minerals: Set(analysis.minerals),
            day: Set(analysis.day),
            month: Set(analysis.month),
            year: Set(analysis.year),
            created_by: Set(analysis.created_by),
            created_at: Set(created_at),
        }
        .insert(self.db)
        .await
        .map_err(|e| ServerError::from_write(e, "An analysis with this ID already exists; please resubmit"))?;

        tracing::info!(
            "Recorded nutritional analysis {} for batch {}",
            model.analysis_id,
            model.batch_id
        );
        Ok(model)
    }

    /// Analyses for a batch, most recent sample date first
    pub async fn analyses_for_batch(&self, batch_id: &str) -> Result<Vec<nutritional_analysis::Model>> {
        Ok(nutritional_analysis::Entity::find()
            .filter(nutritional_analysis::Column::BatchId.eq(batch_id))
            .order_by_desc(nutritional_analysis::Column::Year)
            .order_by_desc(nutritional_analysis::Column::Month)
            .order_by_desc(nutritional_analysis::Column::Day)
            .order_by_desc(nutritional_analysis::Column::CreatedAt)
            .all(self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::inventory::fixtures;
    use sea_orm::PaginatorTrait;

    fn sample(batch_id: &str) -> NewAnalysis {
        NewAnalysis {
            batch_id: batch_id.to_string(),
            calories: 250.5,
            protein: 12.3,
            vitamins: "A,C".to_string(),
            minerals: "Iron,Zinc".to_string(),
            day: 15,
            month: 6,
            year: 2024,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_add_analysis_stores_submitted_values() {
        let db = db::open_in_memory().await;
        fixtures::insert_batch_with_crop(&db, "B-100").await;
        let inventory = Inventory::new(&db);

        let created = inventory
            .add_nutritional_analysis(&IdGenerator::new(), sample("B-100"))
            .await
            .unwrap();
        assert!(created.analysis_id.starts_with("NA-"));

        let stored = inventory.analyses_for_batch("B-100").await.unwrap();
        assert_eq!(stored.len(), 1);
        let row = &stored[0];
        assert_eq!(row.analysis_id, created.analysis_id);
        assert_eq!(row.calories, 250.5);
        assert_eq!(row.protein, 12.3);
        assert_eq!(row.vitamins, "A,C");
        assert_eq!(row.minerals, "Iron,Zinc");
        assert_eq!((row.day, row.month, row.year), (15, 6, 2024));
    }

    #[tokio::test]
    async fn test_out_of_range_day_never_reaches_storage() {
        let db = db::open_in_memory().await;
        fixtures::insert_batch_with_crop(&db, "B-100").await;

        let mut analysis = sample("B-100");
        analysis.day = 31;
        analysis.month = 4;
        let result = Inventory::new(&db)
            .add_nutritional_analysis(&IdGenerator::new(), analysis)
            .await;
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));

        let count = nutritional_analysis::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_unknown_batch_is_rejected_by_schema() {
        let db = db::open_in_memory().await;
        let result = Inventory::new(&db)
            .add_nutritional_analysis(&IdGenerator::new(), sample("B-missing"))
            .await;
        assert!(matches!(result, Err(ServerError::Database(_))));
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut analysis = sample("B-1");
        analysis.protein = -1.0;
        assert!(analysis.validate().is_err());
    }
}
