use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

use super::Inventory;
use crate::dates;
use crate::error::{Result, ServerError};

#[derive(FromQueryResult)]
struct SpoilageRow {
    spoilage_id: String,
    batch_id: String,
    inspected_by: i32,
    inspection_date: String,
    spoilage_level: f64,
    cause: Option<String>,
    action_taken: Option<String>,
    crop_name: Option<String>,
    crop_type: Option<String>,
    crop_variety: Option<String>,
    inspector_username: Option<String>,
    inspector_display_name: Option<String>,
}

/// A spoilage inspection with its batch, crop and inspector resolved
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpoilageDetail {
    #[serde(rename = "SpoilageID")]
    pub spoilage_id: String,
    #[serde(rename = "BatchID")]
    pub batch_id: String,
    #[serde(rename = "CropName")]
    pub crop_name: Option<String>,
    #[serde(rename = "CropType")]
    pub crop_type: Option<String>,
    #[serde(rename = "CropVariety")]
    pub crop_variety: Option<String>,
    #[serde(rename = "InspectedBy")]
    pub inspected_by: i32,
    #[serde(rename = "InspectorName")]
    pub inspector_name: String,
    /// Formatted for display, e.g. "June 15, 2024"
    #[serde(rename = "InspectionDate")]
    pub inspection_date: String,
    #[serde(rename = "SpoilageLevel")]
    pub spoilage_level: f64,
    #[serde(rename = "Cause")]
    pub cause: Option<String>,
    #[serde(rename = "ActionTaken")]
    pub action_taken: Option<String>,
}

impl From<SpoilageRow> for SpoilageDetail {
    fn from(row: SpoilageRow) -> Self {
        let inspector_name = row
            .inspector_display_name
            .or(row.inspector_username)
            .unwrap_or_else(|| "Unknown".to_string());
        Self {
            spoilage_id: row.spoilage_id,
            batch_id: row.batch_id,
            crop_name: row.crop_name,
            crop_type: row.crop_type,
            crop_variety: row.crop_variety,
            inspected_by: row.inspected_by,
            inspector_name,
            inspection_date: dates::format_inspection_date(&row.inspection_date),
            spoilage_level: row.spoilage_level,
            cause: row.cause,
            action_taken: row.action_taken,
        }
    }
}

const SPOILAGE_SELECT: &str = r#"
    SELECT s.spoilage_id, s.batch_id, s.inspected_by, s.inspection_date,
           s.spoilage_level, s.cause, s.action_taken,
           c.crop_name, c.crop_type, c.crop_variety,
           u.username AS inspector_username, u.display_name AS inspector_display_name
    FROM spoilage_control s
    JOIN batch b ON b.batch_id = s.batch_id
    LEFT JOIN crop c ON c.crop_id = (
        SELECT MIN(c2.crop_id) FROM crop c2 WHERE c2.batch_id = b.batch_id
    )
    LEFT JOIN users u ON u.id = s.inspected_by
"#;

impl Inventory<'_> {
    /// Look up one spoilage record by ID
    pub async fn spoilage_detail(&self, spoilage_id: &str) -> Result<SpoilageDetail> {
        let sql = format!("{} WHERE s.spoilage_id = ? LIMIT 1", SPOILAGE_SELECT);
        SpoilageRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [spoilage_id.into()],
        ))
        .one(self.db)
        .await?
        .map(SpoilageDetail::from)
        .ok_or_else(|| ServerError::NotFound("Spoilage record not found".to_string()))
    }

    /// Spoilage records, newest inspection first, optionally for one batch
    pub async fn list_spoilage(&self, batch_id: Option<&str>) -> Result<Vec<SpoilageDetail>> {
        let backend = self.db.get_database_backend();
        let order = "ORDER BY s.inspection_date DESC, s.spoilage_id";
        let statement = match batch_id {
            Some(batch_id) => Statement::from_sql_and_values(
                backend,
                format!("{} WHERE s.batch_id = ? {}", SPOILAGE_SELECT, order),
                [batch_id.into()],
            ),
            None => Statement::from_string(backend, format!("{} {}", SPOILAGE_SELECT, order)),
        };

        let rows = SpoilageRow::find_by_statement(statement).all(self.db).await?;
        Ok(rows.into_iter().map(SpoilageDetail::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::inventory::fixtures;

    #[tokio::test]
    async fn test_spoilage_detail_joins_batch_crop_and_inspector() {
        let db = db::open_in_memory().await;
        let inspector = fixtures::insert_user(&db, "maria").await;
        fixtures::insert_batch_with_crop(&db, "B-100").await;
        fixtures::insert_spoilage(&db, "SP-1", "B-100", inspector.id).await;

        let detail = Inventory::new(&db).spoilage_detail("SP-1").await.unwrap();
        assert_eq!(detail.batch_id, "B-100");
        assert_eq!(detail.crop_name.as_deref(), Some("Wheat"));
        assert_eq!(detail.inspected_by, inspector.id);
        assert_eq!(detail.inspector_name, "maria (inspector)");
        assert_eq!(detail.inspection_date, "June 15, 2024");

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["SpoilageID"], "SP-1");
        assert_eq!(json["CropVariety"], "Durum");
    }

    #[tokio::test]
    async fn test_missing_spoilage_record() {
        let db = db::open_in_memory().await;
        let err = Inventory::new(&db).spoilage_detail("SP-404").await.unwrap_err();
        assert_eq!(err.user_message(), "Spoilage record not found");
    }

    #[tokio::test]
    async fn test_list_spoilage_by_batch() {
        let db = db::open_in_memory().await;
        let inspector = fixtures::insert_user(&db, "maria").await;
        fixtures::insert_batch_with_crop(&db, "B-100").await;
        fixtures::insert_batch_with_crop(&db, "B-200").await;
        fixtures::insert_spoilage(&db, "SP-1", "B-100", inspector.id).await;
        fixtures::insert_spoilage(&db, "SP-2", "B-200", inspector.id).await;

        let inventory = Inventory::new(&db);
        assert_eq!(inventory.list_spoilage(None).await.unwrap().len(), 2);
        let for_batch = inventory.list_spoilage(Some("B-200")).await.unwrap();
        assert_eq!(for_batch.len(), 1);
        assert_eq!(for_batch[0].spoilage_id, "SP-2");
    }

    #[tokio::test]
    async fn test_multi_crop_batch_lists_each_record_once() {
        let db = db::open_in_memory().await;
        let inspector = fixtures::insert_user(&db, "maria").await;
        fixtures::insert_batch_with_crop(&db, "B-100").await;
        fixtures::insert_crop(&db, "B-100", "Barley", "Cereal", "Spring").await;
        fixtures::insert_spoilage(&db, "SP-1", "B-100", inspector.id).await;

        let records = Inventory::new(&db).list_spoilage(None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].crop_name.as_deref(), Some("Wheat"));
    }
}
