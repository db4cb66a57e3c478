//! Demo data for a fresh install.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::model::{
    Costs, FuelType, Maintenance, Mechanic, NewMaintenance, NewPart, NewVehicle, NextMaintenance,
    ServiceCategory, VehicleMaintenanceData,
};

/// A Toyota Corolla with a few months of history.
pub fn sample_data(now: DateTime<Utc>) -> VehicleMaintenanceData {
    let mut vehicle = NewVehicle::new("ABC-1234", "Toyota", "Corolla", 2020, 85_000)
        .with_color("White")
        .with_chassis("9BW12345678901234")
        .with_fuel_type(FuelType::Flex)
        .into_vehicle(now);
    if let Some(created) = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single() {
        vehicle.created_at = created;
    }

    let mut data = VehicleMaintenanceData::new(vehicle, now);
    data.maintenances = sample_maintenances();
    data
}

fn sample_maintenances() -> Vec<Maintenance> {
    let mut events = Vec::new();

    if let Some(date) = ymd(2024, 1, 15) {
        events.push(
            NewMaintenance::new(
                date,
                80_000,
                "Oil and filter change",
                ServiceCategory::Preventive,
                mechanic("John Silva", "Silva Auto Center", "(11) 98765-4321"),
                costs(350.0, 80.0, 250.0, Some(20.0)),
            )
            .with_part(part("Engine oil 5W30", "OIL-5W30-001", "Mobil", 6, 10_000))
            .with_part(part("Oil filter", "FIL-OIL-001", "Fram", 6, 10_000))
            .with_description("Oil changed per the manufacturer schedule.")
            .with_next(NextMaintenance {
                mileage: Some(90_000),
                date: None,
                label: "Oil change".to_string(),
            })
            .into_maintenance(),
        );
    }

    if let Some(date) = ymd(2024, 2, 20) {
        events.push(
            NewMaintenance::new(
                date,
                82_000,
                "Front brake pads",
                ServiceCategory::Corrective,
                mechanic("Carl Mendes", "Mendes Brakes", "(11) 91234-5678"),
                costs(450.0, 150.0, 300.0, None),
            )
            .with_part(part("Front brake pad set", "BRK-PAD-F-002", "Bosch", 12, 20_000))
            .with_description("Pads worn to the limit; rotors within tolerance.")
            .with_next(NextMaintenance {
                mileage: Some(102_000),
                date: None,
                label: "Brake inspection".to_string(),
            })
            .into_maintenance(),
        );
    }

    if let (Some(date), Some(next)) = (ymd(2024, 3, 10), ymd(2024, 9, 10)) {
        events.push(
            NewMaintenance::new(
                date,
                83_000,
                "General review",
                ServiceCategory::Review,
                mechanic("Mary Santos", "Santos Garage", "(11) 99876-5432"),
                costs(850.0, 300.0, 500.0, Some(50.0)),
            )
            .with_part(part("Air filter", "FIL-AIR-003", "Mann", 6, 10_000))
            .with_part(part("Fuel filter", "FIL-FUEL-004", "Mann", 6, 10_000))
            .with_part(part("Spark plugs", "SPK-PLG-005", "NGK", 12, 30_000))
            .with_next(NextMaintenance {
                mileage: Some(93_000),
                date: Some(next),
                label: "General review".to_string(),
            })
            .into_maintenance(),
        );
    }

    if let (Some(date), Some(next)) = (ymd(2024, 5, 12), ymd(2025, 11, 12)) {
        let mut battery = NewPart::new("Battery 60Ah").with_warranty_months(18);
        battery.code = Some("BAT-60AH-006".to_string());
        battery.brand = Some("Moura".to_string());
        events.push(
            NewMaintenance::new(
                date,
                85_000,
                "Battery replacement",
                ServiceCategory::Corrective,
                mechanic("John Silva", "Silva Auto Center", "(11) 98765-4321"),
                costs(480.0, 30.0, 450.0, None),
            )
            .with_part(battery)
            .with_next(NextMaintenance {
                mileage: None,
                date: Some(next),
                label: "Battery check".to_string(),
            })
            .into_maintenance(),
        );
    }

    events
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn mechanic(name: &str, workshop: &str, contact: &str) -> Mechanic {
    Mechanic {
        name: name.to_string(),
        workshop: Some(workshop.to_string()),
        location: "Sao Paulo, SP".to_string(),
        contact: Some(contact.to_string()),
    }
}

fn costs(total: f64, labor: f64, parts: f64, other: Option<f64>) -> Costs {
    Costs {
        labor: Some(labor),
        parts: Some(parts),
        other,
        ..Costs::total(total)
    }
}

fn part(name: &str, code: &str, brand: &str, months: u32, km: u32) -> NewPart {
    let mut part = NewPart::new(name).with_warranty_months(months);
    part.code = Some(code.to_string());
    part.brand = Some(brand.to_string());
    part.warranty_km = Some(km);
    part
}
