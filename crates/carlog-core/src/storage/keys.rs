//! Key layout inside the store.

/// Catalog of registered vehicles (JSON array).
pub const VEHICLES: &str = "vehicles";

/// Primary record for a vehicle.
pub fn vehicle_data(vehicle_id: &str) -> String {
    format!("vehicle-data-{}", vehicle_id)
}

/// Legacy duplicate of [`vehicle_data`], still written for older readers.
pub fn legacy_vehicle(vehicle_id: &str) -> String {
    format!("vehicle-{}", vehicle_id)
}

/// Dismissed alert identifiers for a vehicle (JSON array).
pub fn dismissed_alerts(vehicle_id: &str) -> String {
    format!("dismissed-alerts-{}", vehicle_id)
}
