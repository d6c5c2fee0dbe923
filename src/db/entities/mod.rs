//! Database entities

pub mod batch;
pub mod crop;
pub mod nutritional_analysis;
pub mod shipment_transport;
pub mod spoilage_control;
pub mod transport_vehicle;
pub mod user;

#[cfg(test)]
pub use nutritional_analysis::Entity as NutritionalAnalysis;
#[cfg(test)]
pub use transport_vehicle::Entity as TransportVehicle;
