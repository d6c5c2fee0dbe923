//! Sample rows for trying the UI against an empty database.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use super::entities::{batch, crop, shipment_transport, spoilage_control, transport_vehicle};

struct SampleBatch {
    batch_id: &'static str,
    quantity: f64,
    harvest_date: &'static str,
    location: &'static str,
    crop: (&'static str, &'static str, &'static str),
}

const SAMPLE_BATCHES: &[SampleBatch] = &[
    SampleBatch {
        batch_id: "BATCH-2024-001",
        quantity: 1250.0,
        harvest_date: "2024-05-28",
        location: "Silo 1",
        crop: ("Wheat", "Cereal", "Durum"),
    },
    SampleBatch {
        batch_id: "BATCH-2024-002",
        quantity: 640.0,
        harvest_date: "2024-06-03",
        location: "Cold Store A",
        crop: ("Tomato", "Vegetable", "Roma"),
    },
    SampleBatch {
        batch_id: "BATCH-2024-003",
        quantity: 980.0,
        harvest_date: "2024-06-10",
        location: "Warehouse 3",
        crop: ("Rice", "Cereal", "Basmati"),
    },
];

/// Insert sample batches, crops, a spoilage inspection and vehicles.
///
/// Does nothing when the batch table already has rows.
pub async fn seed_demo_data(db: &DatabaseConnection, inspector_id: i32) -> Result<(), DbErr> {
    if batch::Entity::find().count(db).await? > 0 {
        tracing::debug!("Batch table not empty, skipping demo data");
        return Ok(());
    }

    for sample in SAMPLE_BATCHES {
        batch::ActiveModel {
            batch_id: Set(sample.batch_id.to_string()),
            quantity: Set(sample.quantity),
            unit: Set("kg".to_string()),
            harvest_date: Set(sample.harvest_date.to_string()),
            storage_location: Set(Some(sample.location.to_string())),
        }
        .insert(db)
        .await?;

        let (name, kind, variety) = sample.crop;
        crop::ActiveModel {
            batch_id: Set(sample.batch_id.to_string()),
            crop_name: Set(name.to_string()),
            crop_type: Set(kind.to_string()),
            crop_variety: Set(variety.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    spoilage_control::ActiveModel {
        spoilage_id: Set("SPOIL-2024-001".to_string()),
        batch_id: Set("BATCH-2024-002".to_string()),
        inspected_by: Set(inspector_id),
        inspection_date: Set("2024-06-15".to_string()),
        spoilage_level: Set(6.5),
        cause: Set(Some("Bruising during transport".to_string())),
        action_taken: Set(Some("Damaged crates sorted out".to_string())),
    }
    .insert(db)
    .await?;

    let vehicles = [
        ("TV-DEMO-1", "Flatbed Truck", "KA-01-AB-1234", 20.0),
        ("TV-DEMO-2", "Refrigerated Van", "KA-05-CD-5678", 6.0),
    ];
    for (vehicle_id, vehicle_type, plate, capacity) in vehicles {
        transport_vehicle::ActiveModel {
            vehicle_id: Set(vehicle_id.to_string()),
            vehicle_type: Set(vehicle_type.to_string()),
            license_plate_number: Set(plate.to_string()),
            capacity: Set(capacity),
        }
        .insert(db)
        .await?;
    }

    shipment_transport::ActiveModel {
        shipment_id: Set("SHIP-2024-001".to_string()),
        vehicle_id: Set("TV-DEMO-2".to_string()),
        assigned_at: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Inserted demo data ({} batches)", SAMPLE_BATCHES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::inventory::{fixtures, Inventory};

    #[tokio::test]
    async fn test_seed_once() {
        let db = open_in_memory().await;
        let inspector = fixtures::insert_user(&db, "admin").await;

        seed_demo_data(&db, inspector.id).await.unwrap();
        seed_demo_data(&db, inspector.id).await.unwrap();

        let inventory = Inventory::new(&db);
        assert_eq!(inventory.list_batches().await.unwrap().len(), 3);
        assert_eq!(inventory.list_vehicles().await.unwrap().len(), 2);
        let detail = inventory.spoilage_detail("SPOIL-2024-001").await.unwrap();
        assert_eq!(detail.crop_name.as_deref(), Some("Tomato"));
    }
}
