//! Scan and paste resolution.
//!
//! A scanned code or pasted text can be a reference payload, a bare vehicle
//! identifier, or (from older versions) a whole inline record. [`resolve`]
//! classifies the input and looks the vehicle up in the local store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compact::{decode_value, looks_like_full_payload};
use crate::error::Result;
use crate::garage::Garage;
use crate::model::{Vehicle, VehicleMaintenanceData};
use crate::storage::KeyValueStore;
use crate::vehicle_id::is_valid_vehicle_id;

/// Type tag carried by every reference payload.
pub const REFERENCE_TYPE: &str = "vehicle-maintenance";

/// Small pointer to a vehicle, sized for a scannable code.
///
/// Carries enough for a person to recognise the vehicle, but not its
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub vehicle_id: String,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
}

impl ReferencePayload {
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            kind: REFERENCE_TYPE.to_string(),
            vehicle_id: vehicle.id.clone(),
            plate: vehicle.plate.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Outcome of resolving scanned or pasted text.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The referenced vehicle is stored locally.
    Found(VehicleMaintenanceData),
    /// The input named a vehicle this store has no readable record for.
    NotFound { vehicle_id: String },
    /// The input carried the whole record inline.
    Inline(VehicleMaintenanceData),
    /// The input is not vehicle data.
    Unrecognized(String),
}

/// Classify `input` and look up the vehicle it names.
///
/// Unrecognised input is a normal outcome, not an error; only store failures
/// surface as `Err`.
pub fn resolve<S: KeyValueStore>(input: &str, garage: &Garage<S>) -> Result<Resolution> {
    if let Ok(value) = serde_json::from_str::<Value>(input) {
        if let Some(vehicle_id) = reference_vehicle_id(&value) {
            tracing::debug!(vehicle_id, "input is a reference payload");
            return lookup(vehicle_id, garage);
        }

        if looks_like_full_payload(&value) {
            return match decode_value(value) {
                Ok(data) => {
                    tracing::debug!(vehicle_id = %data.vehicle.id, "input is an inline record");
                    Ok(Resolution::Inline(data))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "inline record did not decode");
                    Ok(Resolution::Unrecognized(input.to_string()))
                }
            };
        }
    }

    let candidate = input.trim();
    if is_valid_vehicle_id(candidate) {
        tracing::debug!(vehicle_id = candidate, "input is a bare identifier");
        return lookup(candidate, garage);
    }

    tracing::debug!("input not recognised");
    Ok(Resolution::Unrecognized(input.to_string()))
}

fn reference_vehicle_id(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some(REFERENCE_TYPE) {
        return None;
    }
    object
        .get("vehicleId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

fn lookup<S: KeyValueStore>(vehicle_id: &str, garage: &Garage<S>) -> Result<Resolution> {
    Ok(match garage.load_data(vehicle_id)? {
        Some(data) => Resolution::Found(data),
        None => Resolution::NotFound {
            vehicle_id: vehicle_id.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::compress;
    use crate::model::NewVehicle;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn garage_with_vehicle() -> (Garage<MemoryStore>, Vehicle) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut garage = Garage::new(MemoryStore::new());
        let vehicle = garage
            .add_vehicle(NewVehicle::new("ABC1234", "Fiat", "Uno", 2010, 50_000), now)
            .unwrap();
        (garage, vehicle)
    }

    #[test]
    fn test_reference_payload_shape() {
        let (_, vehicle) = garage_with_vehicle();
        let json: Value =
            serde_json::from_str(&ReferencePayload::for_vehicle(&vehicle).to_json().unwrap())
                .unwrap();

        assert_eq!(json["type"], "vehicle-maintenance");
        assert_eq!(json["vehicleId"], vehicle.id.as_str());
        assert_eq!(json["plate"], "ABC1234");
        assert_eq!(json["year"], 2010);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_reference_payload_found() {
        let (garage, vehicle) = garage_with_vehicle();
        let payload = ReferencePayload::for_vehicle(&vehicle).to_json().unwrap();

        match resolve(&payload, &garage).unwrap() {
            Resolution::Found(data) => assert_eq!(data.vehicle.id, vehicle.id),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bare_identifier_with_whitespace() {
        let (garage, vehicle) = garage_with_vehicle();
        let input = format!("  {}\n", vehicle.id);

        assert!(matches!(resolve(&input, &garage).unwrap(), Resolution::Found(_)));
    }

    #[test]
    fn test_unknown_vehicle_is_not_found() {
        let (garage, _) = garage_with_vehicle();
        let payload = r#"{"type":"vehicle-maintenance","vehicleId":"VEH-XYZ9999-FORD-KA-2015-abc","plate":"XYZ9999","brand":"Ford","model":"Ka","year":2015}"#;

        assert_eq!(
            resolve(payload, &garage).unwrap(),
            Resolution::NotFound {
                vehicle_id: "VEH-XYZ9999-FORD-KA-2015-abc".to_string()
            }
        );
    }

    #[test]
    fn test_inline_record_skips_lookup() {
        let (source, vehicle) = garage_with_vehicle();
        let data = source.load_data(&vehicle.id).unwrap().unwrap();
        let empty = Garage::new(MemoryStore::new());

        let full = serde_json::to_string(&data).unwrap();
        assert_eq!(resolve(&full, &empty).unwrap(), Resolution::Inline(data.clone()));

        let compact = compress(&data).unwrap();
        assert_eq!(resolve(&compact, &empty).unwrap(), Resolution::Inline(data));
    }

    #[test]
    fn test_unrecognized_inputs() {
        let (garage, _) = garage_with_vehicle();
        for input in [
            "hello",
            "",
            "VEH-SHORT",
            r#"{"type":"other","vehicleId":"VEH-ABC1234-X"}"#,
            r#"{"vehicle": {}, "maintenances": []}"#,
        ] {
            assert!(
                matches!(resolve(input, &garage).unwrap(), Resolution::Unrecognized(_)),
                "{:?}",
                input
            );
        }
    }
}
