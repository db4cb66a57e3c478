use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use carlog_core::model::{Costs, Mechanic, NewMaintenance, NewPart, NextMaintenance};
use carlog_core::{
    resolve, CarlogError, ExportFormat, FileStore, Garage, NewVehicle, ReferencePayload,
    Resolution, ServiceCategory,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let filename = format!("{}_{}_{}.json", prefix, std::process::id(), nanos);
        let path = std::env::temp_dir().join(filename);
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn oil_change() -> NewMaintenance {
    NewMaintenance::new(
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        85_200,
        "Oil change",
        ServiceCategory::Preventive,
        Mechanic {
            name: "Ana".to_string(),
            workshop: Some("Auto Ana".to_string()),
            location: "Porto".to_string(),
            contact: None,
        },
        Costs::total(320.0),
    )
    .with_part(NewPart::new("Oil 5W30").with_warranty_months(6))
    .with_next(NextMaintenance {
        mileage: Some(86_000),
        date: None,
        label: "Oil change".to_string(),
    })
}

#[test]
fn test_vehicle_survives_reopen() {
    let temp = TempFile::new("carlog_reopen");

    let vehicle_id = {
        let store = FileStore::open(&temp.path).expect("open should succeed");
        let mut garage = Garage::new(store);
        let vehicle = garage
            .add_vehicle(NewVehicle::new("ABC1234", "Toyota", "Corolla", 2020, 85_000), now())
            .expect("add vehicle should succeed");
        garage
            .add_maintenance(&vehicle.id, oil_change().into_maintenance(), now())
            .expect("add maintenance should succeed");
        vehicle.id
    };

    let garage = Garage::new(FileStore::open(&temp.path).expect("reopen should succeed"));
    let data = garage
        .load_data(&vehicle_id)
        .expect("load should succeed")
        .expect("record should exist");
    assert_eq!(data.vehicle.current_mileage, 85_200);
    assert_eq!(data.maintenances.len(), 1);
    assert_eq!(
        data.maintenances[0].parts[0].warranty_expires,
        NaiveDate::from_ymd_opt(2024, 11, 20)
    );
}

#[test]
fn test_scan_unknown_then_import_then_found() {
    let source_file = TempFile::new("carlog_source");
    let target_file = TempFile::new("carlog_target");

    let mut source = Garage::new(FileStore::open(&source_file.path).expect("open source"));
    let vehicle = source
        .add_vehicle(NewVehicle::new("XYZ9876", "Fiat", "Uno", 2012, 140_000), now())
        .expect("add vehicle should succeed");
    source
        .add_maintenance(&vehicle.id, oil_change().into_maintenance(), now())
        .expect("add maintenance should succeed");

    let payload = ReferencePayload::for_vehicle(&vehicle)
        .to_json()
        .expect("payload should serialize");
    let export = source
        .export(&vehicle.id, ExportFormat::Pretty, now())
        .expect("export should succeed");

    let mut target = Garage::new(FileStore::open(&target_file.path).expect("open target"));
    let vehicle_id = match resolve(&payload, &target).expect("resolve should succeed") {
        Resolution::NotFound { vehicle_id } => vehicle_id,
        other => panic!("expected NotFound, got {:?}", other),
    };
    assert_eq!(vehicle_id, vehicle.id);

    target
        .import_for(&vehicle_id, &export.contents)
        .expect("import should succeed");

    match resolve(&payload, &target).expect("resolve should succeed") {
        Resolution::Found(data) => {
            assert_eq!(data.vehicle.id, vehicle.id);
            assert_eq!(data.maintenances.len(), 1);
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[test]
fn test_import_mismatch_leaves_store_untouched() {
    let source_file = TempFile::new("carlog_mismatch_source");
    let target_file = TempFile::new("carlog_mismatch_target");

    let mut source = Garage::new(FileStore::open(&source_file.path).expect("open source"));
    let vehicle = source
        .add_vehicle(NewVehicle::new("XYZ9876", "Fiat", "Uno", 2012, 140_000), now())
        .expect("add vehicle should succeed");
    let export = source
        .export(&vehicle.id, ExportFormat::Compact, now())
        .expect("export should succeed");

    let mut target = Garage::new(FileStore::open(&target_file.path).expect("open target"));
    let err = target
        .import_for("VEH-OTHER1-FORD-KA-2015-abc", &export.contents)
        .expect_err("mismatched import should fail");
    assert!(matches!(err, CarlogError::IdentifierMismatch { .. }));
    assert!(!target_file.path.exists());
}

#[test]
fn test_corrupt_record_reads_as_missing() {
    let temp = TempFile::new("carlog_corrupt");
    let id = "VEH-ABC1234-FIAT-UNO-2010-abc";
    let mut contents = std::collections::BTreeMap::new();
    contents.insert("vehicles".to_string(), "[]".to_string());
    contents.insert(format!("vehicle-data-{}", id), "{not json".to_string());
    fs::write(&temp.path, serde_json::to_string(&contents).unwrap()).expect("write should succeed");

    let garage = Garage::new(FileStore::open(&temp.path).expect("open should succeed"));
    assert!(garage.load_data(id).expect("load should succeed").is_none());
    assert_eq!(
        resolve(id, &garage).expect("resolve should succeed"),
        Resolution::NotFound {
            vehicle_id: id.to_string()
        }
    );
}
