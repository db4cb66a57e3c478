//! Core data model for vehicles and their maintenance history.
//!
//! These types mirror the persisted JSON layout: field names are camelCase on
//! the wire, absent optionals are omitted, and calendar dates are written as
//! `YYYY-MM-DD`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CarlogError;
use crate::vehicle_id::generate_vehicle_id;

/// Format tag written into every persisted aggregate.
pub const FORMAT_VERSION: &str = "1.0";

/// A registered vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Permanent identifier, minted once at creation
    pub id: String,

    pub brand: String,

    pub model: String,

    pub year: u16,

    /// License plate
    pub plate: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis: Option<String>,

    /// Odometer reading in km
    pub current_mileage: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,

    pub created_at: DateTime<Utc>,

    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Ethanol,
    Flex,
    Diesel,
    Electric,
    Hybrid,
}

/// A part consumed by a maintenance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_months: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_km: Option<u32>,

    /// Expiration snapshot computed when the event was logged
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "calendar_date::option"
    )]
    pub warranty_expires: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub category: ServiceCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Preventive,
    Corrective,
    /// Scheduled inspection-review ("revision")
    Review,
    Inspection,
    Other,
}

/// Who performed the work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop: Option<String>,

    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Cost breakdown. Sub-costs are informational and need not sum to `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
    pub total: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<CostItem>>,
}

impl Costs {
    pub fn total(total: f64) -> Self {
        Self {
            total,
            labor: None,
            parts: None,
            other: None,
            breakdown: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub item: String,
    pub value: f64,
}

/// Hint for when the next maintenance is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMaintenance {
    /// Target odometer reading in km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "calendar_date::option"
    )]
    pub date: Option<NaiveDate>,

    /// Written as `type` on the wire
    #[serde(default, rename = "type", alias = "label")]
    pub label: String,
}

/// Attached document metadata. Contents are never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,

    pub kind: DocumentKind,

    pub url: String,

    pub name: String,

    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Photo,
    Invoice,
    Report,
    Video,
    Other,
}

/// A single maintenance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: String,

    #[serde(with = "calendar_date")]
    pub date: NaiveDate,

    /// Odometer reading at the time of service
    pub mileage: u32,

    pub service: Service,

    #[serde(default)]
    pub parts: Vec<Part>,

    pub mechanic: Mechanic,

    pub costs: Costs,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_maintenance: Option<NextMaintenance>,
}

impl Maintenance {
    /// Whether any part of this event is still under warranty at `now`.
    pub fn has_active_warranty(&self, now: DateTime<Utc>) -> bool {
        self.parts.iter().any(|part| {
            part.warranty_expires
                .map(|expires| midnight_utc(expires) > now)
                .unwrap_or(false)
        })
    }
}

/// The persisted aggregate: one vehicle plus its history.
///
/// This is the unit of export, import and reference resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMaintenanceData {
    pub vehicle: Vehicle,

    #[serde(default)]
    pub maintenances: Vec<Maintenance>,

    pub created_at: DateTime<Utc>,

    pub last_updated: DateTime<Utc>,

    pub version: String,
}

impl VehicleMaintenanceData {
    /// Start an empty history for a freshly registered vehicle.
    pub fn new(vehicle: Vehicle, now: DateTime<Utc>) -> Self {
        Self {
            created_at: vehicle.created_at,
            vehicle,
            maintenances: Vec::new(),
            last_updated: now,
            version: FORMAT_VERSION.to_string(),
        }
    }
}

/// User input for registering a vehicle.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub current_mileage: u32,
    pub color: Option<String>,
    pub chassis: Option<String>,
    pub fuel_type: Option<FuelType>,
}

impl NewVehicle {
    pub fn new(
        plate: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: u16,
        current_mileage: u32,
    ) -> Self {
        Self {
            plate: plate.into(),
            brand: brand.into(),
            model: model.into(),
            year,
            current_mileage,
            color: None,
            chassis: None,
            fuel_type: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_chassis(mut self, chassis: impl Into<String>) -> Self {
        self.chassis = Some(chassis.into());
        self
    }

    pub fn with_fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = Some(fuel_type);
        self
    }

    /// Build the vehicle record, minting its permanent identifier.
    ///
    /// `Garage::add_vehicle` re-mints on a collision; nothing else generates ids.
    pub fn into_vehicle(self, now: DateTime<Utc>) -> Vehicle {
        let plate = self.plate.trim().to_uppercase();
        let id = generate_vehicle_id(&plate, &self.brand, &self.model, self.year, now);
        Vehicle {
            id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            plate,
            color: self.color,
            chassis: self.chassis,
            current_mileage: self.current_mileage,
            fuel_type: self.fuel_type,
            created_at: now,
            last_updated: now,
        }
    }
}

/// User input for a part consumed by a new maintenance event.
#[derive(Debug, Clone, Default)]
pub struct NewPart {
    pub name: String,
    pub code: Option<String>,
    pub brand: Option<String>,
    pub compatibility: Option<String>,
    pub warranty_months: Option<u32>,
    pub warranty_km: Option<u32>,
}

impl NewPart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_warranty_months(mut self, months: u32) -> Self {
        self.warranty_months = Some(months);
        self
    }
}

/// User input for logging a maintenance event.
#[derive(Debug, Clone)]
pub struct NewMaintenance {
    pub date: NaiveDate,
    pub mileage: u32,
    pub service_name: String,
    pub service_description: Option<String>,
    pub category: ServiceCategory,
    pub parts: Vec<NewPart>,
    pub mechanic: Mechanic,
    pub costs: Costs,
    pub description: Option<String>,
    pub next_maintenance: Option<NextMaintenance>,
}

impl NewMaintenance {
    pub fn new(
        date: NaiveDate,
        mileage: u32,
        service_name: impl Into<String>,
        category: ServiceCategory,
        mechanic: Mechanic,
        costs: Costs,
    ) -> Self {
        Self {
            date,
            mileage,
            service_name: service_name.into(),
            service_description: None,
            category,
            parts: Vec::new(),
            mechanic,
            costs,
            description: None,
            next_maintenance: None,
        }
    }

    pub fn with_part(mut self, part: NewPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn with_next(mut self, next: NextMaintenance) -> Self {
        self.next_maintenance = Some(next);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the event, assigning identifiers and snapshotting part warranties.
    pub fn into_maintenance(self) -> Maintenance {
        let date = self.date;
        let parts = self
            .parts
            .into_iter()
            .map(|part| Part {
                id: Uuid::new_v4().to_string(),
                warranty_expires: part
                    .warranty_months
                    .and_then(|months| warranty_expiration(date, months)),
                name: part.name,
                code: part.code,
                brand: part.brand,
                compatibility: part.compatibility,
                warranty_months: part.warranty_months,
                warranty_km: part.warranty_km,
            })
            .collect();

        Maintenance {
            id: Uuid::new_v4().to_string(),
            date,
            mileage: self.mileage,
            service: Service {
                id: Uuid::new_v4().to_string(),
                name: self.service_name,
                description: self.service_description,
                category: self.category,
            },
            parts,
            mechanic: self.mechanic,
            costs: self.costs,
            description: self.description,
            documents: Vec::new(),
            next_maintenance: self.next_maintenance,
        }
    }
}

/// Warranty expiration for a part installed on `date`.
///
/// Adds calendar months, clamping to the last day of the target month
/// (Jan 31 + 1 month is Feb 28/29).
pub fn warranty_expiration(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// The UTC instant at which a calendar date begins.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

macro_rules! string_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CarlogError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(CarlogError::InvalidInput(format!(
                        "Unknown {}: {} (use {})",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum!(FuelType, "fuel type", {
    Gasoline => "gasoline",
    Ethanol => "ethanol",
    Flex => "flex",
    Diesel => "diesel",
    Electric => "electric",
    Hybrid => "hybrid",
});

string_enum!(ServiceCategory, "service category", {
    Preventive => "preventive",
    Corrective => "corrective",
    Review => "review",
    Inspection => "inspection",
    Other => "other",
});

string_enum!(DocumentKind, "document kind", {
    Photo => "photo",
    Invoice => "invoice",
    Report => "report",
    Video => "video",
    Other => "other",
});

/// Serde adapter for calendar dates.
///
/// Writes `YYYY-MM-DD`; reads either that or an RFC 3339 timestamp
/// (keeping its UTC date).
pub(crate) mod calendar_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mechanic() -> Mechanic {
        Mechanic {
            name: "Ana".to_string(),
            workshop: None,
            location: "Porto".to_string(),
            contact: None,
        }
    }

    #[test]
    fn test_new_vehicle_mints_valid_id() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let vehicle = NewVehicle::new("abc 1234", "Toyota", "Corolla", 2020, 85_000)
            .with_fuel_type(FuelType::Flex)
            .into_vehicle(now);

        assert!(crate::vehicle_id::is_valid_vehicle_id(&vehicle.id));
        assert!(vehicle.id.starts_with("VEH-ABC-1234-TOYOTA-COROLLA-2020-"));
        assert_eq!(vehicle.plate, "ABC 1234");
        assert_eq!(vehicle.created_at, now);
    }

    #[test]
    fn test_warranty_snapshot_computed_from_date() {
        let maintenance = NewMaintenance::new(
            date(2024, 1, 15),
            80_000,
            "Oil change",
            ServiceCategory::Preventive,
            mechanic(),
            Costs::total(350.0),
        )
        .with_part(NewPart::new("Oil 5W30").with_warranty_months(6))
        .with_part(NewPart::new("Wiper"))
        .into_maintenance();

        assert_eq!(maintenance.parts[0].warranty_expires, Some(date(2024, 7, 15)));
        assert_eq!(maintenance.parts[1].warranty_expires, None);
        assert_ne!(maintenance.parts[0].id, maintenance.parts[1].id);
    }

    #[test]
    fn test_warranty_expiration_clamps_month_end() {
        assert_eq!(warranty_expiration(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let part = Part {
            id: "p1".to_string(),
            name: "Filter".to_string(),
            code: None,
            brand: None,
            compatibility: None,
            warranty_months: None,
            warranty_km: None,
            warranty_expires: None,
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"id": "p1", "name": "Filter"}));
    }

    #[test]
    fn test_dates_accept_rfc3339() {
        let next: NextMaintenance = serde_json::from_value(serde_json::json!({
            "date": "2024-09-10T03:00:00.000Z",
            "type": "Review"
        }))
        .unwrap();
        assert_eq!(next.date, Some(date(2024, 9, 10)));

        let json = serde_json::to_value(&next).unwrap();
        assert_eq!(json["date"], "2024-09-10");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Review".parse::<ServiceCategory>().unwrap(), ServiceCategory::Review);
        assert_eq!("diesel".parse::<FuelType>().unwrap(), FuelType::Diesel);
        assert!("steam".parse::<FuelType>().is_err());
    }

    #[test]
    fn test_active_warranty() {
        let mut maintenance = NewMaintenance::new(
            date(2024, 1, 15),
            80_000,
            "Brakes",
            ServiceCategory::Corrective,
            mechanic(),
            Costs::total(450.0),
        )
        .with_part(NewPart::new("Pads").with_warranty_months(12))
        .into_maintenance();

        let before = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(maintenance.has_active_warranty(before));
        assert!(!maintenance.has_active_warranty(after));

        maintenance.parts.clear();
        assert!(!maintenance.has_active_warranty(before));
    }
}
