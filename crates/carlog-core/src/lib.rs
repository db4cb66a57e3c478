//! # Carlog Core
//!
//! Core library for Carlog - a local-first vehicle maintenance tracker.
//!
//! This crate provides the data model, alert engine, portability formats and
//! storage abstractions, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **model**: Vehicles, maintenance events and their builders
//! - **alerts**: Mileage, time and warranty alerts; dismissal tracking
//! - **vehicle_id**: Identifier minting and validation
//! - **compact**: Full-payload codec (pretty and compact forms)
//! - **resolve**: Reference payloads and scan/paste resolution
//! - **storage**: Key-value store port with memory and file backends
//! - **garage**: Repository over the store
//! - **dashboard**: Summary figures and history timeline
//! - **sample**: Demo data for a fresh install

pub mod alerts;
pub mod compact;
pub mod dashboard;
pub mod error;
pub mod fs;
pub mod garage;
pub mod model;
pub mod resolve;
pub mod sample;
pub mod storage;
pub mod vehicle_id;

pub use alerts::{
    generate_alerts, generate_alerts_with, Alert, AlertKind, AlertPriority, AlertThresholds,
    DismissedAlerts,
};
pub use compact::{compress, decode_full_payload, decompress, is_data_too_large, MAX_QR_SIZE};
pub use dashboard::{timeline, DashboardSummary, MaintenanceStatus};
pub use error::{CarlogError, Result};
pub use garage::{Export, ExportFormat, Garage};
pub use model::{
    Costs, FuelType, Maintenance, Mechanic, NewMaintenance, NewPart, NewVehicle, NextMaintenance,
    Part, Service, ServiceCategory, Vehicle, VehicleMaintenanceData,
};
pub use resolve::{resolve, ReferencePayload, Resolution};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use vehicle_id::{generate_vehicle_id, is_valid_vehicle_id, parse_vehicle_id};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
