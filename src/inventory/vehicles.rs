use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, Set, SqlErr, Statement, TransactionTrait,
};

use super::Inventory;
use crate::db::entities::{shipment_transport, transport_vehicle};
use crate::error::{Result, ServerError};
use crate::ids::IdGenerator;

/// A validated vehicle submission
#[derive(Clone, Debug, PartialEq)]
pub struct NewVehicle {
    pub vehicle_type: String,
    pub license_plate_number: String,
    pub capacity: f64,
}

/// Row of the vehicle list, with how many shipments use the vehicle
#[derive(Clone, Debug, PartialEq, FromQueryResult, serde::Serialize)]
pub struct VehicleRow {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub license_plate_number: String,
    pub capacity: f64,
    pub shipment_count: i64,
}

const VEHICLE_LIST_SQL: &str = r#"
    SELECT v.vehicle_id, v.vehicle_type, v.license_plate_number, v.capacity,
           COUNT(st.shipment_transport_id) AS shipment_count
    FROM transport_vehicle v
    LEFT JOIN shipment_transport st ON st.vehicle_id = v.vehicle_id
    GROUP BY v.vehicle_id
    ORDER BY v.vehicle_type, v.license_plate_number
"#;

impl Inventory<'_> {
    /// All vehicles ordered by type
    pub async fn list_vehicles(&self) -> Result<Vec<VehicleRow>> {
        Ok(VehicleRow::find_by_statement(Statement::from_string(
            self.db.get_database_backend(),
            VEHICLE_LIST_SQL,
        ))
        .all(self.db)
        .await?)
    }

    /// Register a vehicle under a freshly generated ID
    pub async fn add_vehicle(
        &self,
        ids: &IdGenerator,
        vehicle: NewVehicle,
    ) -> Result<transport_vehicle::Model> {
        if vehicle.capacity <= 0.0 {
            return Err(ServerError::InvalidRequest(
                "Capacity must be greater than zero".to_string(),
            ));
        }

        let conflict = format!(
            "A vehicle with license plate {} already exists",
            vehicle.license_plate_number
        );
        let model = transport_vehicle::ActiveModel {
            vehicle_id: Set(ids.vehicle_id()),
            vehicle_type: Set(vehicle.vehicle_type),
            license_plate_number: Set(vehicle.license_plate_number),
            capacity: Set(vehicle.capacity),
        }
        .insert(self.db)
        .await
        .map_err(|e| ServerError::from_write(e, &conflict))?;

        tracing::info!(
            "Added vehicle {} ({})",
            model.vehicle_id,
            model.license_plate_number
        );
        Ok(model)
    }

    /// Delete a vehicle that no shipment references.
    ///
    /// The reference check and the delete share one transaction, and the
    /// schema's `ON DELETE RESTRICT` catches an assignment that slips in
    /// between them.
    pub async fn delete_vehicle(&self, vehicle_id: &str) -> Result<()> {
        let txn = self.db.begin().await?;

        let shipments = shipment_transport::Entity::find()
            .filter(shipment_transport::Column::VehicleId.eq(vehicle_id))
            .count(&txn)
            .await?;
        if shipments > 0 {
            txn.rollback().await?;
            return Err(ServerError::VehicleInUse {
                vehicle_id: vehicle_id.to_string(),
                shipments,
            });
        }

        let result = transport_vehicle::Entity::delete_by_id(vehicle_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| restrict_violation(e, vehicle_id))?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServerError::NotFound("Vehicle not found".to_string()));
        }

        txn.commit().await?;
        tracing::info!("Deleted vehicle {}", vehicle_id);
        Ok(())
    }
}

fn restrict_violation(err: DbErr, vehicle_id: &str) -> ServerError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::warn!("Vehicle {} gained a shipment during delete: {}", vehicle_id, detail);
            ServerError::VehicleInUse {
                vehicle_id: vehicle_id.to_string(),
                shipments: 1,
            }
        }
        _ => ServerError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::inventory::fixtures;

    fn truck(plate: &str) -> NewVehicle {
        NewVehicle {
            vehicle_type: "Truck".to_string(),
            license_plate_number: plate.to_string(),
            capacity: 18.5,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_vehicles() {
        let db = db::open_in_memory().await;
        let inventory = Inventory::new(&db);
        let ids = IdGenerator::new();

        let created = inventory.add_vehicle(&ids, truck("KA-01-1234")).await.unwrap();
        assert!(created.vehicle_id.starts_with("TV-"));
        inventory
            .add_vehicle(
                &ids,
                NewVehicle {
                    vehicle_type: "Refrigerated Van".to_string(),
                    license_plate_number: "KA-02-9999".to_string(),
                    capacity: 4.0,
                },
            )
            .await
            .unwrap();

        let vehicles = inventory.list_vehicles().await.unwrap();
        let types: Vec<&str> = vehicles.iter().map(|v| v.vehicle_type.as_str()).collect();
        assert_eq!(types, vec!["Refrigerated Van", "Truck"]);
        assert!(vehicles.iter().all(|v| v.shipment_count == 0));
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_conflict() {
        let db = db::open_in_memory().await;
        let inventory = Inventory::new(&db);
        let ids = IdGenerator::new();

        inventory.add_vehicle(&ids, truck("KA-01-1234")).await.unwrap();
        let err = inventory.add_vehicle(&ids, truck("KA-01-1234")).await.unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let db = db::open_in_memory().await;
        let mut vehicle = truck("KA-01-1234");
        vehicle.capacity = 0.0;
        let err = Inventory::new(&db)
            .add_vehicle(&IdGenerator::new(), vehicle)
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_referenced_vehicle_is_kept() {
        let db = db::open_in_memory().await;
        fixtures::insert_vehicle(&db, "TV-1", "Truck", "KA-01").await;
        fixtures::assign_shipment(&db, "SH-1", "TV-1").await;
        fixtures::assign_shipment(&db, "SH-2", "TV-1").await;

        let inventory = Inventory::new(&db);
        let err = inventory.delete_vehicle("TV-1").await.unwrap_err();
        assert!(matches!(err, ServerError::VehicleInUse { shipments: 2, .. }));

        let vehicles = inventory.list_vehicles().await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].shipment_count, 2);
    }

    #[tokio::test]
    async fn test_unreferenced_vehicle_is_deleted() {
        let db = db::open_in_memory().await;
        fixtures::insert_vehicle(&db, "TV-1", "Truck", "KA-01").await;
        fixtures::insert_vehicle(&db, "TV-2", "Truck", "KA-02").await;

        let inventory = Inventory::new(&db);
        inventory.delete_vehicle("TV-1").await.unwrap();

        let remaining: Vec<String> = inventory
            .list_vehicles()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.vehicle_id)
            .collect();
        assert_eq!(remaining, vec!["TV-2".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_unknown_vehicle() {
        let db = db::open_in_memory().await;
        let err = Inventory::new(&db).delete_vehicle("TV-404").await.unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
    }
}
