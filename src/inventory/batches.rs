use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

use super::Inventory;
use crate::error::{Result, ServerError};

/// A batch joined with its crop
#[derive(Clone, Debug, PartialEq, FromQueryResult, serde::Serialize)]
pub struct BatchCrop {
    pub batch_id: String,
    pub quantity: f64,
    pub unit: String,
    pub harvest_date: String,
    pub storage_location: Option<String>,
    pub crop_name: String,
    pub crop_type: String,
    pub crop_variety: String,
}

/// Row of the batch list
#[derive(Clone, Debug, PartialEq, FromQueryResult, serde::Serialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub quantity: f64,
    pub unit: String,
    pub harvest_date: String,
    pub crop_name: Option<String>,
    pub crop_type: Option<String>,
    pub analysis_count: i64,
}

const BATCH_CROP_SQL: &str = r#"
    SELECT b.batch_id, b.quantity, b.unit, b.harvest_date, b.storage_location,
           c.crop_name, c.crop_type, c.crop_variety
    FROM batch b
    JOIN crop c ON c.batch_id = b.batch_id
    WHERE b.batch_id = ?
"#;

const BATCH_LIST_SQL: &str = r#"
    SELECT b.batch_id, b.quantity, b.unit, b.harvest_date,
           MIN(c.crop_name) AS crop_name, MIN(c.crop_type) AS crop_type,
           (SELECT COUNT(*) FROM nutritional_analysis na WHERE na.batch_id = b.batch_id) AS analysis_count
    FROM batch b
    LEFT JOIN crop c ON c.batch_id = b.batch_id
    GROUP BY b.batch_id
    ORDER BY b.harvest_date DESC, b.batch_id
"#;

impl Inventory<'_> {
    /// Fetch a batch with its crop; exactly one joined row must exist
    pub async fn batch_with_crop(&self, batch_id: &str) -> Result<BatchCrop> {
        let mut rows = BatchCrop::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            BATCH_CROP_SQL,
            [batch_id.into()],
        ))
        .all(self.db)
        .await?;

        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(ServerError::NotFound(format!("Batch '{}' not found", batch_id))),
            n => {
                tracing::warn!("Batch {} matched {} crop rows", batch_id, n);
                Err(ServerError::Conflict(format!(
                    "Batch '{}' has {} crop records; expected exactly one",
                    batch_id, n
                )))
            }
        }
    }

    /// All batches, newest harvest first
    pub async fn list_batches(&self) -> Result<Vec<BatchSummary>> {
        Ok(BatchSummary::find_by_statement(Statement::from_string(
            self.db.get_database_backend(),
            BATCH_LIST_SQL,
        ))
        .all(self.db)
        .await?)
    }
}
