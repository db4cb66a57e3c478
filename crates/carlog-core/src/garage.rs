//! Repository over the key-value store.
//!
//! `Garage` owns the key layout: the `vehicles` catalog, one primary record
//! per vehicle plus its legacy duplicate, and the dismissed-alert sets. Each
//! operation is a short sequence of store writes with no transaction around
//! it, so an interrupted write can leave the catalog and records out of step.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;

use crate::alerts::DismissedAlerts;
use crate::compact::{compress, decode_full_payload};
use crate::error::{CarlogError, Result};
use crate::model::{Maintenance, NewVehicle, Vehicle, VehicleMaintenanceData};
use crate::sample::sample_data;
use crate::storage::{keys, KeyValueStore};
use crate::vehicle_id::generate_vehicle_id;

/// Serialization used by [`Garage::export`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Indented full-key JSON.
    #[default]
    Pretty,
    /// Single-line JSON with shortened keys.
    Compact,
}

/// A serialized vehicle record ready to be written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

pub struct Garage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Garage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// All registered vehicles, in registration order.
    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.read_json(keys::VEHICLES)?.unwrap_or_default())
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Result<Option<Vehicle>> {
        Ok(self
            .list_vehicles()?
            .into_iter()
            .find(|vehicle| vehicle.id == vehicle_id))
    }

    /// Register a vehicle and start its empty history.
    ///
    /// The identifier is unique among stored vehicles: when the minted one is
    /// already taken, it is minted again one millisecond later.
    pub fn add_vehicle(&mut self, new_vehicle: NewVehicle, now: DateTime<Utc>) -> Result<Vehicle> {
        let mut vehicle = new_vehicle.into_vehicle(now);

        let mut catalog = self.list_vehicles()?;
        let mut minted_at = now;
        while self.id_in_use(&catalog, &vehicle.id)? {
            minted_at += Duration::milliseconds(1);
            vehicle.id = generate_vehicle_id(
                &vehicle.plate,
                &vehicle.brand,
                &vehicle.model,
                vehicle.year,
                minted_at,
            );
            tracing::debug!(vehicle_id = %vehicle.id, "identifier taken, minted again");
        }

        catalog.push(vehicle.clone());
        self.write_json(keys::VEHICLES, &catalog)?;
        self.save_data(&VehicleMaintenanceData::new(vehicle.clone(), now))?;

        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.plate, "registered vehicle");
        Ok(vehicle)
    }

    fn id_in_use(&self, catalog: &[Vehicle], vehicle_id: &str) -> Result<bool> {
        if catalog.iter().any(|vehicle| vehicle.id == vehicle_id) {
            return Ok(true);
        }
        Ok(self.store.get(&keys::vehicle_data(vehicle_id))?.is_some()
            || self.store.get(&keys::legacy_vehicle(vehicle_id))?.is_some())
    }

    /// Load a vehicle's record, falling back to the legacy key.
    ///
    /// Unreadable records are logged and reported as absent.
    pub fn load_data(&self, vehicle_id: &str) -> Result<Option<VehicleMaintenanceData>> {
        if let Some(data) = self.read_json(&keys::vehicle_data(vehicle_id))? {
            return Ok(Some(data));
        }
        self.read_json(&keys::legacy_vehicle(vehicle_id))
    }

    /// Like [`Self::load_data`], but a missing record is an error.
    pub fn require_data(&self, vehicle_id: &str) -> Result<VehicleMaintenanceData> {
        self.load_data(vehicle_id)?
            .ok_or_else(|| CarlogError::NotFound(format!("vehicle {}", vehicle_id)))
    }

    /// Write a record under its primary key and the legacy key.
    pub fn save_data(&mut self, data: &VehicleMaintenanceData) -> Result<()> {
        let id = &data.vehicle.id;
        self.write_json(&keys::vehicle_data(id), data)?;
        self.write_json(&keys::legacy_vehicle(id), data)
    }

    /// Append a maintenance event, advancing the odometer when the event's
    /// reading is higher. The odometer never moves backward.
    pub fn add_maintenance(
        &mut self,
        vehicle_id: &str,
        maintenance: Maintenance,
        now: DateTime<Utc>,
    ) -> Result<VehicleMaintenanceData> {
        let mut data = self.require_data(vehicle_id)?;

        if maintenance.mileage > data.vehicle.current_mileage {
            tracing::debug!(
                vehicle_id,
                from = data.vehicle.current_mileage,
                to = maintenance.mileage,
                "advancing odometer"
            );
            data.vehicle.current_mileage = maintenance.mileage;
            data.vehicle.last_updated = now;
        }
        data.maintenances.push(maintenance);
        data.last_updated = now;

        self.save_data(&data)?;
        self.upsert_catalog(&data.vehicle)?;
        Ok(data)
    }

    /// Delete one maintenance event. Returns `false` if no event had that id.
    pub fn remove_maintenance(
        &mut self,
        vehicle_id: &str,
        maintenance_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut data = self.require_data(vehicle_id)?;
        let before = data.maintenances.len();
        data.maintenances.retain(|m| m.id != maintenance_id);
        if data.maintenances.len() == before {
            return Ok(false);
        }
        data.last_updated = now;
        self.save_data(&data)?;
        Ok(true)
    }

    /// Drop a vehicle from the catalog along with every key it owns.
    ///
    /// Returns `false` if nothing was stored for that id.
    pub fn remove_vehicle(&mut self, vehicle_id: &str) -> Result<bool> {
        let mut catalog = self.list_vehicles()?;
        let before = catalog.len();
        catalog.retain(|vehicle| vehicle.id != vehicle_id);
        let in_catalog = catalog.len() != before;
        let had_data = self.load_data(vehicle_id)?.is_some();

        if in_catalog {
            self.write_json(keys::VEHICLES, &catalog)?;
        }
        self.store.remove(&keys::vehicle_data(vehicle_id))?;
        self.store.remove(&keys::legacy_vehicle(vehicle_id))?;
        self.store.remove(&keys::dismissed_alerts(vehicle_id))?;

        if in_catalog || had_data {
            tracing::info!(vehicle_id, "removed vehicle");
        }
        Ok(in_catalog || had_data)
    }

    /// Serialize a vehicle's record for a file download.
    ///
    /// The file name is `vehicle-<plate>-<YYYY-MM-DD>.json`, dated `now`.
    pub fn export(
        &self,
        vehicle_id: &str,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Export> {
        let data = self.require_data(vehicle_id)?;
        let contents = match format {
            ExportFormat::Pretty => serde_json::to_string_pretty(&data)?,
            ExportFormat::Compact => compress(&data)?,
        };
        let file_name = export_file_name(&data.vehicle, now);

        tracing::info!(vehicle_id, file = %file_name, "exported vehicle");
        Ok(Export {
            file_name,
            contents,
        })
    }

    /// Import a full payload under the vehicle id it carries.
    ///
    /// Overwrites any existing record for that id and upserts the catalog.
    pub fn import(&mut self, text: &str) -> Result<VehicleMaintenanceData> {
        let data = decode_full_payload(text).map_err(|err| {
            tracing::warn!(error = %err, "rejected import payload");
            err
        })?;
        self.store_import(&data)?;
        Ok(data)
    }

    /// Import a full payload for the identifier a scan produced.
    ///
    /// # Errors
    ///
    /// Returns `CarlogError::IdentifierMismatch` if the payload belongs to a
    /// different vehicle; identifiers are never rewritten.
    pub fn import_for(&mut self, vehicle_id: &str, text: &str) -> Result<VehicleMaintenanceData> {
        let data = decode_full_payload(text)?;
        if data.vehicle.id != vehicle_id {
            tracing::warn!(
                expected = vehicle_id,
                found = %data.vehicle.id,
                "import payload belongs to another vehicle"
            );
            return Err(CarlogError::IdentifierMismatch {
                expected: vehicle_id.to_string(),
                found: data.vehicle.id,
            });
        }
        self.store_import(&data)?;
        Ok(data)
    }

    pub fn dismissed_alerts(&self, vehicle_id: &str) -> Result<DismissedAlerts> {
        Ok(self
            .read_json(&keys::dismissed_alerts(vehicle_id))?
            .unwrap_or_default())
    }

    pub fn save_dismissed_alerts(
        &mut self,
        vehicle_id: &str,
        dismissed: &DismissedAlerts,
    ) -> Result<()> {
        let key = keys::dismissed_alerts(vehicle_id);
        if dismissed.is_empty() {
            return self.store.remove(&key);
        }
        self.write_json(&key, dismissed)
    }

    /// Install the demo vehicle, but only into an empty garage.
    ///
    /// Returns the seeded vehicle, or `None` if vehicles already exist.
    pub fn seed_sample(&mut self, now: DateTime<Utc>) -> Result<Option<Vehicle>> {
        if !self.list_vehicles()?.is_empty() {
            return Ok(None);
        }
        let data = sample_data(now);
        self.store_import(&data)?;
        Ok(Some(data.vehicle))
    }

    fn store_import(&mut self, data: &VehicleMaintenanceData) -> Result<()> {
        self.save_data(data)?;
        self.upsert_catalog(&data.vehicle)?;
        tracing::info!(
            vehicle_id = %data.vehicle.id,
            maintenances = data.maintenances.len(),
            "imported vehicle"
        );
        Ok(())
    }

    fn upsert_catalog(&mut self, vehicle: &Vehicle) -> Result<()> {
        let mut catalog = self.list_vehicles()?;
        match catalog.iter_mut().find(|v| v.id == vehicle.id) {
            Some(existing) => *existing = vehicle.clone(),
            None => catalog.push(vehicle.clone()),
        }
        self.write_json(keys::VEHICLES, &catalog)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}

fn export_file_name(vehicle: &Vehicle, now: DateTime<Utc>) -> String {
    format!(
        "vehicle-{}-{}.json",
        vehicle.plate,
        now.date_naive().format("%Y-%m-%d")
    )
}
