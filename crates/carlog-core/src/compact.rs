//! Full-payload codec.
//!
//! A full payload is a [`VehicleMaintenanceData`] as JSON. The compact form
//! renames every known key through a fixed alias table so the text is
//! shorter; values are untouched. Keys outside the table pass through as-is.

use serde_json::{Map, Value};

use crate::error::{CarlogError, Result};
use crate::model::VehicleMaintenanceData;

/// Largest reference payload, in characters, that fits a scannable code.
pub const MAX_QR_SIZE: usize = 2500;

/// Whether `payload` is too long to be encoded as a scannable code.
pub fn is_data_too_large(payload: &str) -> bool {
    payload.chars().count() > MAX_QR_SIZE
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Root,
    Vehicle,
    Maintenance,
    Service,
    Part,
    Mechanic,
    Costs,
    CostItem,
    NextMaintenance,
    Document,
}

#[derive(Debug, Clone, Copy)]
enum Nested {
    Leaf,
    One(Shape),
    Many(Shape),
}

use Nested::{Leaf, Many, One};

type Alias = (&'static str, &'static str, Nested);

impl Shape {
    fn aliases(self) -> &'static [Alias] {
        match self {
            Shape::Root => &[
                ("version", "v", Leaf),
                ("vehicle", "vh", One(Shape::Vehicle)),
                ("maintenances", "m", Many(Shape::Maintenance)),
                ("createdAt", "ca", Leaf),
                ("lastUpdated", "lu", Leaf),
            ],
            Shape::Vehicle => &[
                ("id", "id", Leaf),
                ("brand", "b", Leaf),
                ("model", "m", Leaf),
                ("year", "y", Leaf),
                ("plate", "p", Leaf),
                ("color", "c", Leaf),
                ("chassis", "ch", Leaf),
                ("currentMileage", "km", Leaf),
                ("fuelType", "f", Leaf),
                ("createdAt", "ca", Leaf),
                ("lastUpdated", "lu", Leaf),
            ],
            Shape::Maintenance => &[
                ("id", "id", Leaf),
                ("date", "d", Leaf),
                ("mileage", "km", Leaf),
                ("service", "s", One(Shape::Service)),
                ("parts", "p", Many(Shape::Part)),
                ("mechanic", "me", One(Shape::Mechanic)),
                ("costs", "co", One(Shape::Costs)),
                ("description", "de", Leaf),
                ("documents", "dc", Many(Shape::Document)),
                ("nextMaintenance", "nm", One(Shape::NextMaintenance)),
            ],
            Shape::Service => &[
                ("id", "id", Leaf),
                ("name", "n", Leaf),
                ("description", "d", Leaf),
                ("category", "c", Leaf),
            ],
            Shape::Part => &[
                ("id", "id", Leaf),
                ("name", "n", Leaf),
                ("code", "c", Leaf),
                ("brand", "b", Leaf),
                ("compatibility", "cp", Leaf),
                ("warrantyMonths", "wm", Leaf),
                ("warrantyKm", "wk", Leaf),
                ("warrantyExpires", "we", Leaf),
            ],
            Shape::Mechanic => &[
                ("name", "n", Leaf),
                ("workshop", "w", Leaf),
                ("location", "l", Leaf),
                ("contact", "ct", Leaf),
            ],
            Shape::Costs => &[
                ("total", "t", Leaf),
                ("labor", "l", Leaf),
                ("parts", "pt", Leaf),
                ("other", "o", Leaf),
                ("breakdown", "bd", Many(Shape::CostItem)),
            ],
            Shape::CostItem => &[("item", "i", Leaf), ("value", "x", Leaf)],
            Shape::NextMaintenance => &[
                ("mileage", "km", Leaf),
                ("date", "d", Leaf),
                ("type", "t", Leaf),
            ],
            Shape::Document => &[
                ("id", "id", Leaf),
                ("kind", "k", Leaf),
                ("url", "u", Leaf),
                ("name", "n", Leaf),
                ("uploadedAt", "ua", Leaf),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Shorten,
    Expand,
}

fn rename(value: Value, shape: Shape, direction: Direction) -> Value {
    let Value::Object(map) = value else {
        return value;
    };

    let mut out = Map::with_capacity(map.len());
    for (key, inner) in map {
        let entry = shape.aliases().iter().find(|(full, short, _)| match direction {
            Direction::Shorten => *full == key,
            Direction::Expand => *short == key,
        });

        match entry {
            Some(&(full, short, nested)) => {
                let target = match direction {
                    Direction::Shorten => short,
                    Direction::Expand => full,
                };
                out.insert(target.to_string(), rename_nested(inner, nested, direction));
            }
            None => {
                out.insert(key, inner);
            }
        }
    }
    Value::Object(out)
}

fn rename_nested(value: Value, nested: Nested, direction: Direction) -> Value {
    match (nested, value) {
        (One(shape), value) => rename(value, shape, direction),
        (Many(shape), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| rename(item, shape, direction))
                .collect(),
        ),
        (_, value) => value,
    }
}

/// Serialize `data` with shortened keys.
pub fn compress(data: &VehicleMaintenanceData) -> Result<String> {
    let value = serde_json::to_value(data)?;
    Ok(serde_json::to_string(&rename(
        value,
        Shape::Root,
        Direction::Shorten,
    ))?)
}

/// Parse a compact payload back into the full model.
pub fn decompress(text: &str) -> Result<VehicleMaintenanceData> {
    let value: Value = serde_json::from_str(text).map_err(invalid_json)?;
    let expanded = rename(value, Shape::Root, Direction::Expand);
    decode_checked(expanded)
}

/// Whether a parsed value has the full-payload structure, in either form.
pub fn looks_like_full_payload(value: &Value) -> bool {
    payload_form(value).is_some()
}

/// Decode a full payload written in either the full or the compact form.
///
/// # Errors
///
/// Returns `CarlogError::InvalidPayload` when the text is not JSON, lacks a
/// `vehicle` object and a `maintenances` list, or does not match the model.
pub fn decode_full_payload(text: &str) -> Result<VehicleMaintenanceData> {
    let value: Value = serde_json::from_str(text).map_err(invalid_json)?;
    decode_value(value)
}

pub(crate) fn decode_value(value: Value) -> Result<VehicleMaintenanceData> {
    match payload_form(&value) {
        Some(Form::Compact) => decode_checked(rename(value, Shape::Root, Direction::Expand)),
        Some(Form::Full) | None => decode_checked(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Full,
    Compact,
}

fn payload_form(value: &Value) -> Option<Form> {
    let object = value.as_object()?;
    let has = |vehicle: &str, maintenances: &str| {
        object.get(vehicle).map(Value::is_object).unwrap_or(false)
            && object.get(maintenances).map(Value::is_array).unwrap_or(false)
    };
    if has("vehicle", "maintenances") {
        Some(Form::Full)
    } else if has("vh", "m") {
        Some(Form::Compact)
    } else {
        None
    }
}

fn decode_checked(value: Value) -> Result<VehicleMaintenanceData> {
    if payload_form(&value) != Some(Form::Full) {
        return Err(CarlogError::InvalidPayload(
            "Invalid file format: expected a vehicle object and a maintenances list".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| CarlogError::InvalidPayload(format!("Invalid maintenance data: {}", e)))
}

fn invalid_json(err: serde_json::Error) -> CarlogError {
    CarlogError::InvalidPayload(format!("Not valid JSON: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CostItem, Costs, Document, DocumentKind, FuelType, Mechanic, NewMaintenance, NewPart,
        NewVehicle, NextMaintenance, ServiceCategory,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> VehicleMaintenanceData {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let vehicle = NewVehicle::new("ABC1234", "Fiat", "Uno", 2010, 120_000)
            .with_color("Red")
            .into_vehicle(now);
        let mut data = VehicleMaintenanceData::new(vehicle, now);

        let mut costs = Costs::total(300.0);
        costs.labor = Some(100.0);
        costs.breakdown = Some(vec![CostItem {
            item: "Oil".to_string(),
            value: 200.0,
        }]);
        let maintenance = NewMaintenance::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            119_500,
            "Oil change",
            ServiceCategory::Preventive,
            Mechanic {
                name: "Ana".to_string(),
                workshop: Some("Auto Ana".to_string()),
                location: "Porto".to_string(),
                contact: None,
            },
            costs,
        )
        .with_part(NewPart::new("Oil 5W30").with_warranty_months(6))
        .with_next(NextMaintenance {
            mileage: Some(129_500),
            date: None,
            label: "Next oil change".to_string(),
        })
        .into_maintenance();
        data.maintenances.push(maintenance);
        data
    }

    /// Every optional field set, with costs that do not print exactly.
    fn fully_populated() -> VehicleMaintenanceData {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let vehicle = NewVehicle::new("XYZ9876", "Toyota", "Corolla", 2020, 85_000)
            .with_color("Silver")
            .with_chassis("9BWZZZ377VT004251")
            .with_fuel_type(FuelType::Flex)
            .into_vehicle(now);
        let mut data = VehicleMaintenanceData::new(vehicle, now);

        let costs = Costs {
            total: 271.0 / 3.0,
            labor: Some(0.1 + 0.2),
            parts: Some(1.0 / 7.0),
            other: Some(90.33333333333333),
            breakdown: Some(vec![CostItem {
                item: "Brake pads".to_string(),
                value: 2.0 / 3.0,
            }]),
        };
        let mut part = NewPart::new("Brake pads").with_warranty_months(12);
        part.code = Some("BP-220".to_string());
        part.brand = Some("Bosch".to_string());
        part.compatibility = Some("Corolla 2018-2022".to_string());
        part.warranty_km = Some(20_000);

        let mut maintenance = NewMaintenance::new(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            84_000,
            "Brake service",
            ServiceCategory::Corrective,
            Mechanic {
                name: "Carlos".to_string(),
                workshop: Some("Freios Centro".to_string()),
                location: "Lisboa".to_string(),
                contact: Some("+351 912 345 678".to_string()),
            },
            costs,
        )
        .with_part(part)
        .with_description("Front pads were below 2 mm")
        .with_next(NextMaintenance {
            mileage: Some(94_000),
            date: NaiveDate::from_ymd_opt(2025, 3, 10),
            label: "Brake inspection".to_string(),
        });
        maintenance.service_description = Some("Replace front pads, bleed lines".to_string());

        let mut maintenance = maintenance.into_maintenance();
        maintenance.documents.push(Document {
            id: "doc-1".to_string(),
            kind: DocumentKind::Invoice,
            url: "file:///invoices/brakes.pdf".to_string(),
            name: "brakes.pdf".to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap(),
        });
        data.maintenances.push(maintenance);
        data
    }

    #[test]
    fn test_fully_populated_record_survives_compaction() {
        let data = fully_populated();
        let compact = compress(&data).unwrap();
        assert_eq!(decompress(&compact).unwrap(), data);

        let pretty = serde_json::to_string_pretty(&data).unwrap();
        assert_eq!(decode_full_payload(&pretty).unwrap(), data);

        let value: Value = serde_json::from_str(&compact).unwrap();
        let vehicle = &value["vh"];
        assert_eq!(vehicle["ch"], "9BWZZZ377VT004251");
        assert_eq!(vehicle["f"], "flex");
        let event = &value["m"][0];
        assert_eq!(event["s"]["d"], "Replace front pads, bleed lines");
        assert_eq!(event["de"], "Front pads were below 2 mm");
        assert_eq!(event["me"]["ct"], "+351 912 345 678");
        assert_eq!(event["p"][0]["c"], "BP-220");
        assert_eq!(event["p"][0]["b"], "Bosch");
        assert_eq!(event["p"][0]["cp"], "Corolla 2018-2022");
        assert_eq!(event["p"][0]["wk"], 20_000);
        assert_eq!(event["nm"]["km"], 94_000);
        assert_eq!(event["nm"]["d"], "2025-03-10");
        assert_eq!(event["dc"][0]["k"], "invoice");
        assert_eq!(event["dc"][0]["u"], "file:///invoices/brakes.pdf");
        assert_eq!(event["dc"][0]["n"], "brakes.pdf");
        assert!(event["dc"][0]["ua"].is_string());
    }

    #[test]
    fn test_costs_round_trip_bit_for_bit() {
        let mut data = sample();
        for i in 1..2_000u32 {
            let total = f64::from(i) / 3.0;
            data.maintenances[0].costs.total = total;
            let restored = decompress(&compress(&data).unwrap()).unwrap();
            assert_eq!(
                restored.maintenances[0].costs.total.to_bits(),
                total.to_bits(),
                "{}",
                total
            );
        }
    }

    #[test]
    fn test_compress_decompress_preserves_every_field() {
        let data = sample();
        let compact = compress(&data).unwrap();

        assert_eq!(decompress(&compact).unwrap(), data);
        assert!(compact.len() < serde_json::to_string(&data).unwrap().len());
    }

    #[test]
    fn test_compact_keys_follow_alias_table() {
        let compact: Value = serde_json::from_str(&compress(&sample()).unwrap()).unwrap();

        assert_eq!(compact["v"], "1.0");
        assert_eq!(compact["vh"]["b"], "Fiat");
        assert_eq!(compact["vh"]["km"], 120_000);
        assert_eq!(compact["m"][0]["s"]["n"], "Oil change");
        assert_eq!(compact["m"][0]["co"]["bd"][0]["i"], "Oil");
        assert_eq!(compact["m"][0]["nm"]["t"], "Next oil change");
        assert_eq!(compact["m"][0]["p"][0]["we"], "2024-11-02");
        // Absent optionals stay absent.
        assert!(compact["vh"].get("ch").is_none());
        assert!(compact["m"][0]["nm"].get("d").is_none());
    }

    #[test]
    fn test_decode_full_payload_accepts_both_forms() {
        let data = sample();
        let full = serde_json::to_string_pretty(&data).unwrap();
        let compact = compress(&data).unwrap();

        assert_eq!(decode_full_payload(&full).unwrap(), data);
        assert_eq!(decode_full_payload(&compact).unwrap(), data);
    }

    #[test]
    fn test_decode_full_payload_rejects_wrong_structure() {
        for text in [
            "not json",
            "[]",
            r#"{"vehicle": {}}"#,
            r#"{"vehicle": [], "maintenances": []}"#,
            r#"{"vehicle": {}, "maintenances": {}}"#,
        ] {
            let err = decode_full_payload(text).unwrap_err();
            assert!(matches!(err, CarlogError::InvalidPayload(_)), "{}", text);
        }

        // Right structure, wrong contents.
        let err = decode_full_payload(r#"{"vehicle": {"id": 1}, "maintenances": []}"#).unwrap_err();
        assert!(matches!(err, CarlogError::InvalidPayload(_)));
    }

    #[test]
    fn test_size_limit() {
        assert!(!is_data_too_large(&"x".repeat(MAX_QR_SIZE)));
        assert!(is_data_too_large(&"x".repeat(MAX_QR_SIZE + 1)));
    }
}
