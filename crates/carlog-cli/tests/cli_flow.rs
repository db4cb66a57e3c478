use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const NOW: &str = "2024-07-01T12:00:00Z";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_carlog"))
}

fn temp_xdg_dirs(prefix: &str) -> (PathBuf, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let base = std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    let config = base.join("config");
    let data = base.join("data");
    std::fs::create_dir_all(&config).expect("create config dir");
    std::fs::create_dir_all(&data).expect("create data dir");
    (config, data)
}

fn apply_xdg_env(cmd: &mut Command, config: &Path, data: &Path) {
    cmd.env("XDG_CONFIG_HOME", config)
        .env("XDG_DATA_HOME", data)
        .env("CARLOG_NOW", NOW)
        .env_remove("CARLOG_STORE")
        .env_remove("CARLOG_CONFIG")
        .env_remove("CARLOG_LOG")
        .env_remove("CARLOG_FORMAT");
}

fn carlog(args: &[&str], config: &Path, data: &Path) -> Output {
    let mut cmd = Command::new(bin());
    cmd.args(args);
    apply_xdg_env(&mut cmd, config, data);
    cmd.output().expect("run carlog")
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed: stdout={}, stderr={}",
        what,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("parse json output")
}

#[test]
fn test_cli_init_seed_dashboard() {
    let (config_home, data_home) = temp_xdg_dirs("carlog_init");
    let store = data_home.join("garage.json");
    let store_arg = store.to_str().expect("utf8 path");

    let init = carlog(
        &["init", store_arg, "--timezone", "America/Sao_Paulo"],
        &config_home,
        &data_home,
    );
    assert_success(&init, "init");
    assert!(store.exists());
    let config_text = std::fs::read_to_string(config_home.join("carlog").join("config.toml"))
        .expect("read config");
    let config: toml::Value = toml::from_str(&config_text).expect("parse config");
    assert_eq!(config["store"]["path"].as_str(), Some(store_arg));
    assert_eq!(config["ui"]["timezone"].as_str(), Some("America/Sao_Paulo"));

    // Second init without --force refuses to overwrite.
    let again = carlog(&["init", store_arg], &config_home, &data_home);
    assert_eq!(again.status.code(), Some(4));

    let seed = carlog(&["seed"], &config_home, &data_home);
    assert_success(&seed, "seed");
    assert!(String::from_utf8_lossy(&seed.stdout).contains("status=ok"));

    let reseed = carlog(&["seed"], &config_home, &data_home);
    assert_success(&reseed, "reseed");
    assert!(String::from_utf8_lossy(&reseed.stdout).contains("status=skipped"));

    let list = carlog(&["vehicle", "list", "--json"], &config_home, &data_home);
    assert_success(&list, "vehicle list");
    let vehicles = json_stdout(&list);
    let vehicles = vehicles.as_array().expect("vehicle array");
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["plate"], "ABC-1234");

    let dashboard = carlog(&["dashboard", "abc1234", "--json"], &config_home, &data_home);
    assert_success(&dashboard, "dashboard");
    let value = json_stdout(&dashboard);
    assert_eq!(value["vehicle"]["currentMileage"], 85_000);
    assert_eq!(value["summary"]["maintenanceCount"], 4);
    assert_eq!(value["summary"]["pendingCount"], 2);
    assert_eq!(value["summary"]["totalCost"], 2130.0);
    assert_eq!(
        value["summary"]["nextMaintenance"]["nextMaintenance"]["type"],
        "General review"
    );
}

#[test]
fn test_cli_vehicle_and_service_flow() {
    let (config_home, data_home) = temp_xdg_dirs("carlog_service");

    let add = carlog(
        &[
            "vehicle", "add", "--plate", "xyz9876", "--brand", "Fiat", "--model", "Uno",
            "--year", "2012", "--mileage", "140000", "--fuel", "flex", "--json",
        ],
        &config_home,
        &data_home,
    );
    assert_success(&add, "vehicle add");
    let vehicle = json_stdout(&add);
    assert_eq!(vehicle["plate"], "XYZ9876");
    assert_eq!(vehicle["fuelType"], "flex");
    let vehicle_id = vehicle["id"].as_str().expect("vehicle id").to_string();
    assert!(vehicle_id.starts_with("VEH-"));

    let service = carlog(
        &[
            "service", "add", "XYZ9876", "--date", "2024-06-01", "--mileage", "140500",
            "--name", "Oil change", "--mechanic", "Ana", "--location", "Porto", "--total",
            "320", "--part", "Oil 5W30:6", "--next-km", "150000", "--json",
        ],
        &config_home,
        &data_home,
    );
    assert_success(&service, "service add");
    let maintenance = json_stdout(&service);
    assert_eq!(maintenance["parts"][0]["warrantyExpires"], "2024-12-01");
    assert_eq!(maintenance["nextMaintenance"]["mileage"], 150_000);
    let maintenance_id = maintenance["id"].as_str().expect("maintenance id").to_string();

    let show = carlog(&["vehicle", "show", &vehicle_id, "--json"], &config_home, &data_home);
    assert_success(&show, "vehicle show");
    assert_eq!(json_stdout(&show)["vehicle"]["currentMileage"], 140_500);

    let bad_category = carlog(
        &[
            "service", "add", "XYZ9876", "--mileage", "1", "--name", "X", "--mechanic", "Ana",
            "--location", "Porto", "--total", "1", "--category", "magic",
        ],
        &config_home,
        &data_home,
    );
    assert_eq!(bad_category.status.code(), Some(4));

    let remove = carlog(
        &["service", "remove", "XYZ9876", &maintenance_id[..8]],
        &config_home,
        &data_home,
    );
    assert_success(&remove, "service remove");

    let list = carlog(&["service", "list", "XYZ9876", "--json"], &config_home, &data_home);
    assert_success(&list, "service list");
    assert_eq!(json_stdout(&list).as_array().map(Vec::len), Some(0));

    let remove_vehicle = carlog(
        &["vehicle", "remove", "XYZ9876", "--yes"],
        &config_home,
        &data_home,
    );
    assert_success(&remove_vehicle, "vehicle remove");
    let missing = carlog(&["dashboard", "XYZ9876"], &config_home, &data_home);
    assert_eq!(missing.status.code(), Some(3));
}

#[test]
fn test_cli_alerts_dismiss_and_restore() {
    let (config_home, data_home) = temp_xdg_dirs("carlog_alerts");
    assert_success(&carlog(&["seed"], &config_home, &data_home), "seed");

    let list = carlog(&["alerts", "list", "ABC-1234", "--json"], &config_home, &data_home);
    assert_success(&list, "alerts list");
    let alerts = json_stdout(&list);
    let alerts = alerts.as_array().expect("alert array").clone();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a["type"] == "warranty"));
    let alert_id = alerts[0]["id"].as_str().expect("alert id").to_string();

    let dismiss = carlog(
        &["alerts", "dismiss", "ABC-1234", &alert_id],
        &config_home,
        &data_home,
    );
    assert_success(&dismiss, "alerts dismiss");

    let after = carlog(&["alerts", "list", "ABC-1234", "--json"], &config_home, &data_home);
    assert_eq!(json_stdout(&after).as_array().map(Vec::len), Some(1));

    let all = carlog(
        &["alerts", "list", "ABC-1234", "--all", "--json"],
        &config_home,
        &data_home,
    );
    let all = json_stdout(&all);
    let all = all.as_array().expect("alert array");
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|a| a["dismissed"] == true).count(), 1);

    let unknown = carlog(
        &["alerts", "dismiss", "ABC-1234", "no-such-alert"],
        &config_home,
        &data_home,
    );
    assert_eq!(unknown.status.code(), Some(3));

    let restore = carlog(
        &["alerts", "restore", "ABC-1234", "--all"],
        &config_home,
        &data_home,
    );
    assert_success(&restore, "alerts restore");
    let restored = carlog(&["alerts", "list", "ABC-1234", "--json"], &config_home, &data_home);
    assert_eq!(json_stdout(&restored).as_array().map(Vec::len), Some(2));
}

#[test]
fn test_cli_export_import_and_resolve() {
    let (config_home, data_home) = temp_xdg_dirs("carlog_share");
    let owner_store = data_home.join("owner.json");
    let mechanic_store = data_home.join("mechanic.json");
    let owner = owner_store.to_str().expect("utf8 path");
    let mechanic = mechanic_store.to_str().expect("utf8 path");
    let out_dir = data_home.join("exports");
    std::fs::create_dir_all(&out_dir).expect("create export dir");

    assert_success(
        &carlog(&["--store", owner, "seed"], &config_home, &data_home),
        "seed",
    );

    let export = carlog(
        &[
            "--store",
            owner,
            "export",
            "ABC-1234",
            "--compact",
            "--out",
            out_dir.to_str().expect("utf8 path"),
        ],
        &config_home,
        &data_home,
    );
    assert_success(&export, "export");
    let export_file = out_dir.join("vehicle-ABC-1234-2024-07-01.json");
    assert!(export_file.exists());
    let export_path = export_file.to_str().expect("utf8 path");

    let qr = carlog(&["--store", owner, "qr", "ABC-1234", "--json"], &config_home, &data_home);
    assert_success(&qr, "qr");
    let payload = String::from_utf8_lossy(&qr.stdout).trim().to_string();
    let reference: serde_json::Value = serde_json::from_str(&payload).expect("payload json");
    assert_eq!(reference["type"], "vehicle-maintenance");
    let vehicle_id = reference["vehicleId"].as_str().expect("vehicle id").to_string();

    // Unknown to the mechanic's store until the record is imported.
    let unknown = carlog(
        &["--store", mechanic, "resolve", &payload],
        &config_home,
        &data_home,
    );
    assert_eq!(unknown.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("not in this store"));

    let mismatch = carlog(
        &[
            "--store",
            mechanic,
            "import",
            export_path,
            "--as",
            "VEH-OTHER1-FORD-KA-2015-abc",
        ],
        &config_home,
        &data_home,
    );
    assert_eq!(mismatch.status.code(), Some(4));

    let imported = carlog(
        &["--store", mechanic, "resolve", &payload, "--import", export_path, "--json"],
        &config_home,
        &data_home,
    );
    assert_success(&imported, "resolve --import");
    let value = json_stdout(&imported);
    assert_eq!(value["status"], "imported");
    assert_eq!(value["vehicleId"], vehicle_id.as_str());
    assert_eq!(value["maintenances"], 4);

    let found = carlog(
        &["--store", mechanic, "resolve", &vehicle_id],
        &config_home,
        &data_home,
    );
    assert_success(&found, "resolve by id");
    let stdout = String::from_utf8_lossy(&found.stdout);
    assert!(stdout.contains("status=found"));
    assert!(stdout.contains("plate=ABC-1234"));

    let garbage = carlog(
        &["--store", mechanic, "resolve", "hello there"],
        &config_home,
        &data_home,
    );
    assert_eq!(garbage.status.code(), Some(4));
}

#[test]
fn test_cli_errors_carry_hints() {
    let (config_home, data_home) = temp_xdg_dirs("carlog_errors");

    let missing = carlog(&["dashboard", "UNKNOWN"], &config_home, &data_home);
    assert_eq!(missing.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("error=Vehicle 'UNKNOWN' not found"));
    assert!(stderr.contains("hint=Run `carlog vehicle list`"));

    let bad_file = carlog(&["import", "/no/such/file.json"], &config_home, &data_home);
    assert_eq!(bad_file.status.code(), Some(3));

    let quickstart = carlog(&[], &config_home, &data_home);
    assert_success(&quickstart, "no command");
    assert!(String::from_utf8_lossy(&quickstart.stdout).contains("Quickstart"));
}
