//! Path resolution for config and store files, and vehicle lookup.

use std::path::PathBuf;

use carlog_core::{is_valid_vehicle_id, FileStore, Garage};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, CarlogConfig};
use crate::constants::env;
use crate::errors::CliError;

/// Resolve the config file path, checking CARLOG_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path: `--store` (or CARLOG_STORE), then config, then
/// the XDG data directory.
pub fn resolve_store_path(cli: &Cli, config: Option<&CarlogConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.store.path));
    }
    default_store_path()
}

/// Find a vehicle by identifier or by plate.
///
/// Identifiers match exactly, including records missing from the catalog.
/// Plates match case-insensitively against the catalog.
pub fn find_vehicle_id(garage: &Garage<FileStore>, query: &str) -> anyhow::Result<String> {
    let query = query.trim();

    if is_valid_vehicle_id(query) && garage.load_data(query)?.is_some() {
        return Ok(query.to_string());
    }

    let plate = normalize_plate(query);
    let found = garage
        .list_vehicles()?
        .into_iter()
        .find(|vehicle| vehicle.id == query || normalize_plate(&vehicle.plate) == plate);

    match found {
        Some(vehicle) => Ok(vehicle.id),
        None => Err(CliError::not_found(
            format!("Vehicle '{}' not found", query),
            "Hint: Run `carlog vehicle list` to see registered vehicles.",
        )
        .into()),
    }
}

fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::Parser;

    use carlog_core::NewVehicle;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" abc-1234 "), "ABC1234");
        assert_eq!(normalize_plate("ABC1234"), "ABC1234");
    }

    #[test]
    fn test_store_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["carlog", "--store", "/tmp/flag.json", "seed"])
            .expect("parse");
        let config = CarlogConfig::new(PathBuf::from("/tmp/config.json"), None);
        let path = resolve_store_path(&cli, Some(&config)).expect("resolve");
        assert_eq!(path, PathBuf::from("/tmp/flag.json"));
    }

    #[test]
    fn test_find_vehicle_by_id_or_plate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(&dir.path().join("store.json")).expect("open");
        let mut garage = Garage::new(store);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let vehicle = garage
            .add_vehicle(NewVehicle::new("ABC-1234", "Toyota", "Corolla", 2020, 85_000), now)
            .expect("add vehicle");

        assert_eq!(find_vehicle_id(&garage, &vehicle.id).expect("by id"), vehicle.id);
        assert_eq!(find_vehicle_id(&garage, "abc1234").expect("by plate"), vehicle.id);

        let err = find_vehicle_id(&garage, "ZZZ9999").expect_err("unknown plate");
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
