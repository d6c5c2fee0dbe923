//! Data access for the inventory pages.
//!
//! Each page borrows an [`Inventory`] from its request context and runs a
//! handful of parameterised statements through it. Lookups that expect a
//! single row report zero rows as `ServerError::NotFound`.

mod analysis;
mod batches;
mod spoilage;
mod vehicles;

pub use analysis::NewAnalysis;
pub use batches::BatchCrop;
pub use spoilage::SpoilageDetail;
pub use vehicles::NewVehicle;

use sea_orm::DatabaseConnection;

pub struct Inventory<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Inventory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Rows shared by the inventory and web UI tests.

    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

    use crate::db::entities::{batch, crop, shipment_transport, spoilage_control, transport_vehicle, user};

    pub async fn insert_user(db: &DatabaseConnection, username: &str) -> user::Model {
        user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(String::new()),
            display_name: Set(Some(format!("{} (inspector)", username))),
            created_at: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    pub async fn insert_batch(db: &DatabaseConnection, batch_id: &str) {
        batch::ActiveModel {
            batch_id: Set(batch_id.to_string()),
            quantity: Set(1200.0),
            unit: Set("kg".to_string()),
            harvest_date: Set("2024-05-30".to_string()),
            storage_location: Set(Some("Silo 2".to_string())),
        }
        .insert(db)
        .await
        .unwrap();
    }

    pub async fn insert_crop(db: &DatabaseConnection, batch_id: &str, name: &str, kind: &str, variety: &str) {
        crop::ActiveModel {
            batch_id: Set(batch_id.to_string()),
            crop_name: Set(name.to_string()),
            crop_type: Set(kind.to_string()),
            crop_variety: Set(variety.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    /// A batch with exactly one crop row
    pub async fn insert_batch_with_crop(db: &DatabaseConnection, batch_id: &str) {
        insert_batch(db, batch_id).await;
        insert_crop(db, batch_id, "Wheat", "Cereal", "Durum").await;
    }

    pub async fn insert_spoilage(db: &DatabaseConnection, spoilage_id: &str, batch_id: &str, inspector: i32) {
        spoilage_control::ActiveModel {
            spoilage_id: Set(spoilage_id.to_string()),
            batch_id: Set(batch_id.to_string()),
            inspected_by: Set(inspector),
            inspection_date: Set("2024-06-15".to_string()),
            spoilage_level: Set(4.5),
            cause: Set(Some("Moisture".to_string())),
            action_taken: Set(Some("Dried and re-bagged".to_string())),
        }
        .insert(db)
        .await
        .unwrap();
    }

    pub async fn insert_vehicle(db: &DatabaseConnection, vehicle_id: &str, kind: &str, plate: &str) {
        transport_vehicle::ActiveModel {
            vehicle_id: Set(vehicle_id.to_string()),
            vehicle_type: Set(kind.to_string()),
            license_plate_number: Set(plate.to_string()),
            capacity: Set(10.0),
        }
        .insert(db)
        .await
        .unwrap();
    }

    pub async fn assign_shipment(db: &DatabaseConnection, shipment_id: &str, vehicle_id: &str) {
        shipment_transport::ActiveModel {
            shipment_id: Set(shipment_id.to_string()),
            vehicle_id: Set(vehicle_id.to_string()),
            assigned_at: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }
}
