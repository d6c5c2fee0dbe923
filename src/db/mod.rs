//! Database module for SQLite persistence using SeaORM

pub mod entities;
mod seed;

pub use seed::seed_demo_data;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

/// Connect to the database and create tables
pub async fn init_database(db_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", db_url);

    let mut options = ConnectOptions::new(db_url.to_string());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Open a private in-memory database with the full schema.
///
/// Pinned to one connection: every SQLite `:memory:` connection is its own database.
#[cfg(test)]
pub async fn open_in_memory() -> DatabaseConnection {
    init_database("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

async fn execute_ddl(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string()))
        .await
        .map(|_| ())
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Referential integrity is declared in the schema; sqlx enables
    // foreign key enforcement on every SQLite connection it opens.
    execute_ddl(db, "PRAGMA foreign_keys = ON").await?;

    // Users table (login accounts and spoilage inspectors)
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL DEFAULT '',
            display_name TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .await?;

    // Batches are created by the intake process, not by this application
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS batch (
            batch_id TEXT PRIMARY KEY,
            quantity REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL DEFAULT 'kg',
            harvest_date TEXT NOT NULL,
            storage_location TEXT
        )
        "#,
    )
    .await?;

    // Crop details, one row per batch
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS crop (
            crop_id INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_id TEXT NOT NULL,
            crop_name TEXT NOT NULL,
            crop_type TEXT NOT NULL,
            crop_variety TEXT NOT NULL,
            FOREIGN KEY (batch_id) REFERENCES batch(batch_id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    execute_ddl(db, "CREATE INDEX IF NOT EXISTS idx_crop_batch ON crop(batch_id)").await?;

    // Nutritional analyses
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS nutritional_analysis (
            analysis_id TEXT PRIMARY KEY,
            batch_id TEXT NOT NULL,
            calories REAL NOT NULL,
            protein REAL NOT NULL,
            vitamins TEXT NOT NULL,
            minerals TEXT NOT NULL,
            day INTEGER NOT NULL,
            month INTEGER NOT NULL,
            year INTEGER NOT NULL,
            created_by INTEGER,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (batch_id) REFERENCES batch(batch_id) ON DELETE RESTRICT,
            FOREIGN KEY (created_by) REFERENCES users(id) ON DELETE SET NULL
        )
        "#,
    )
    .await?;
    execute_ddl(
        db,
        "CREATE INDEX IF NOT EXISTS idx_analysis_batch ON nutritional_analysis(batch_id)",
    )
    .await?;

    // Spoilage inspections
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS spoilage_control (
            spoilage_id TEXT PRIMARY KEY,
            batch_id TEXT NOT NULL,
            inspected_by INTEGER NOT NULL,
            inspection_date TEXT NOT NULL,
            spoilage_level REAL NOT NULL DEFAULT 0,
            cause TEXT,
            action_taken TEXT,
            FOREIGN KEY (batch_id) REFERENCES batch(batch_id) ON DELETE RESTRICT,
            FOREIGN KEY (inspected_by) REFERENCES users(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;
    execute_ddl(
        db,
        "CREATE INDEX IF NOT EXISTS idx_spoilage_batch ON spoilage_control(batch_id)",
    )
    .await?;

    // Transport vehicles
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS transport_vehicle (
            vehicle_id TEXT PRIMARY KEY,
            vehicle_type TEXT NOT NULL,
            license_plate_number TEXT NOT NULL UNIQUE,
            capacity REAL NOT NULL
        )
        "#,
    )
    .await?;

    // Shipment assignments; RESTRICT keeps a referenced vehicle from being deleted
    execute_ddl(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS shipment_transport (
            shipment_transport_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shipment_id TEXT NOT NULL,
            vehicle_id TEXT NOT NULL,
            assigned_at INTEGER NOT NULL,
            FOREIGN KEY (vehicle_id) REFERENCES transport_vehicle(vehicle_id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;
    execute_ddl(
        db,
        "CREATE INDEX IF NOT EXISTS idx_shipment_transport_vehicle ON shipment_transport(vehicle_id)",
    )
    .await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};
    use tempfile::TempDir;

    use super::entities::{shipment_transport, transport_vehicle};

    #[tokio::test]
    async fn test_file_database_persists_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.db");
        let url = format!("sqlite:{}?mode=rwc", path.display());

        let db = init_database(&url, 2).await.unwrap();
        transport_vehicle::ActiveModel {
            vehicle_id: Set("TV-1".to_string()),
            vehicle_type: Set("Truck".to_string()),
            license_plate_number: Set("KA-01".to_string()),
            capacity: Set(12.0),
        }
        .insert(&db)
        .await
        .unwrap();
        drop(db);

        // Re-running the DDL on an existing file must be harmless
        let db = init_database(&url, 2).await.unwrap();
        let vehicles = entities::TransportVehicle::find().all(&db).await.unwrap();
        assert_eq!(vehicles.len(), 1);
    }

    #[tokio::test]
    async fn test_restrict_blocks_deleting_referenced_vehicle() {
        let db = open_in_memory().await;
        transport_vehicle::ActiveModel {
            vehicle_id: Set("TV-1".to_string()),
            vehicle_type: Set("Truck".to_string()),
            license_plate_number: Set("KA-01".to_string()),
            capacity: Set(12.0),
        }
        .insert(&db)
        .await
        .unwrap();
        shipment_transport::ActiveModel {
            shipment_id: Set("SH-1".to_string()),
            vehicle_id: Set("TV-1".to_string()),
            assigned_at: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let result = entities::TransportVehicle::delete_by_id("TV-1".to_string())
            .exec(&db)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unknown_vehicle_reference_rejected() {
        let db = open_in_memory().await;
        let result = shipment_transport::ActiveModel {
            shipment_id: Set("SH-1".to_string()),
            vehicle_id: Set("TV-missing".to_string()),
            assigned_at: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(result.is_err());
    }
}
