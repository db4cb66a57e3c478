use std::path::{Path, PathBuf};

use serde_json::json;

use carlog_core::fs::write_atomic;
use carlog_core::{
    compress, is_data_too_large, parse_vehicle_id, resolve, ExportFormat, ReferencePayload,
    Resolution, VehicleMaintenanceData, MAX_QR_SIZE,
};

use crate::app::{find_vehicle_id, AppContext};
use crate::cli::{ExportArgs, ImportArgs, QrArgs, ResolveArgs};
use crate::errors::CliError;
use crate::helpers::read_input;
use crate::output::{print_json, vehicle_label};
use crate::ui::format::format_bytes;
use crate::ui::{badge, hint, kv, print, receipt, Badge, UiContext};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let format = if args.compact {
        ExportFormat::Compact
    } else {
        ExportFormat::Pretty
    };
    let export = garage.export(&vehicle_id, format, ctx.now()?)?;

    if args.out.as_deref() == Some("-") {
        println!("{}", export.contents);
        return Ok(());
    }

    let destination = export_destination(args.out.as_deref(), &export.file_name);
    write_atomic(&destination, export.contents.as_bytes()).map_err(|e| {
        anyhow::anyhow!("Failed to write export {}: {}", destination.display(), e)
    })?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let file = destination.display().to_string();
        let size = format_bytes(export.contents.len() as u64);
        let format_name = if args.compact { "compact" } else { "pretty" };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Exported",
                &[
                    ("File", file.as_str()),
                    ("Size", size.as_str()),
                    ("Format", format_name),
                ],
            ),
        );
    }
    Ok(())
}

/// An existing directory receives the generated file name; anything else is
/// taken as the file path.
fn export_destination(out: Option<&str>, file_name: &str) -> PathBuf {
    match out {
        None => PathBuf::from(file_name),
        Some(path) if Path::new(path).is_dir() => Path::new(path).join(file_name),
        Some(path) => PathBuf::from(path),
    }
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let text = read_input(&args.file)?;
    let mut garage = ctx.open_garage()?;
    let data = match args.as_id.as_deref() {
        Some(vehicle_id) => garage.import_for(vehicle_id.trim(), &text)?,
        None => garage.import(&text)?,
    };
    report_import(ctx, args.json, "Imported", &data)
}

fn report_import(
    ctx: &AppContext,
    json: bool,
    title: &str,
    data: &VehicleMaintenanceData,
) -> anyhow::Result<()> {
    if json {
        return print_json(&json!({
            "status": "imported",
            "vehicleId": data.vehicle.id,
            "plate": data.vehicle.plate,
            "maintenances": data.maintenances.len(),
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    let label = vehicle_label(&data.vehicle);
    let events = data.maintenances.len().to_string();
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            title,
            &[
                ("ID", data.vehicle.id.as_str()),
                ("Plate", data.vehicle.plate.as_str()),
                ("Vehicle", label.as_str()),
                ("Events", events.as_str()),
            ],
        ),
    );
    Ok(())
}

pub fn handle_qr(ctx: &AppContext, args: &QrArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;
    let payload = ReferencePayload::for_vehicle(&data.vehicle).to_json()?;

    if args.json {
        println!("{}", payload);
        return Ok(());
    }

    let full = compress(&data)?;
    let full_fits = !is_data_too_large(&full);
    let ui_ctx = ctx.ui_context(false);

    if !ui_ctx.mode.is_pretty() {
        println!("payload={}", payload);
        println!("full_size={}", full.chars().count());
        println!("full_fits_qr={}", full_fits);
        return Ok(());
    }

    print(&ui_ctx, &kv(&ui_ctx, "Payload", &payload));
    print(
        &ui_ctx,
        &hint(&ui_ctx, "Encode this text as a QR code and stick it in the glovebox."),
    );
    if full_fits {
        print(
            &ui_ctx,
            &badge(
                &ui_ctx,
                Badge::Info,
                &format!(
                    "Full record is {} characters and also fits in a QR code (`carlog export --compact`)",
                    full.chars().count()
                ),
            ),
        );
    } else {
        print(&ui_ctx, &oversize_warning(&ui_ctx, full.chars().count()));
    }
    Ok(())
}

fn oversize_warning(ui_ctx: &UiContext, size: usize) -> String {
    badge(
        ui_ctx,
        Badge::Warn,
        &format!(
            "Full record is {} characters, over the {}-character QR limit; share it with `carlog export`",
            size, MAX_QR_SIZE
        ),
    )
}

pub fn handle_resolve(ctx: &AppContext, args: &ResolveArgs) -> anyhow::Result<()> {
    let input = if args.input == "-" {
        read_input("-")?
    } else {
        args.input.clone()
    };

    let mut garage = ctx.open_garage()?;
    match resolve(&input, &garage)? {
        Resolution::Found(data) => {
            if args.json {
                return print_json(&json!({
                    "status": "found",
                    "vehicleId": data.vehicle.id,
                    "data": data,
                }));
            }
            report_found(ctx, &data);
            Ok(())
        }
        Resolution::NotFound { vehicle_id } => match args.import.as_deref() {
            Some(file) => {
                let text = read_input(file)?;
                let data = garage.import_for(&vehicle_id, &text)?;
                report_import(ctx, args.json, "Imported", &data)
            }
            None => Err(CliError::not_found(
                not_in_store_message(&vehicle_id),
                "Hint: Ask the owner for an export, then run `carlog resolve <INPUT> --import <FILE>`.",
            )
            .into()),
        },
        Resolution::Inline(data) => {
            // Inline records never overwrite local history.
            if garage.load_data(&data.vehicle.id)?.is_some() {
                tracing::info!(vehicle_id = %data.vehicle.id, "inline record already stored");
                if args.json {
                    return print_json(&json!({
                        "status": "found",
                        "vehicleId": data.vehicle.id,
                        "data": data,
                    }));
                }
                report_found(ctx, &data);
                return Ok(());
            }
            let data = garage.import(&input)?;
            report_import(ctx, args.json, "Imported inline record", &data)
        }
        Resolution::Unrecognized(reason) => Err(CliError::invalid_input(format!(
            "Not a vehicle code: {}",
            reason
        ))
        .into()),
    }
}

fn report_found(ctx: &AppContext, data: &VehicleMaintenanceData) {
    if ctx.quiet() {
        println!("{}", data.vehicle.id);
        return;
    }
    let ui_ctx = ctx.ui_context(false);
    if ui_ctx.mode.is_pretty() {
        print(
            &ui_ctx,
            &badge(
                &ui_ctx,
                Badge::Ok,
                &format!("{} ({})", vehicle_label(&data.vehicle), data.vehicle.plate),
            ),
        );
        print(&ui_ctx, &kv(&ui_ctx, "ID", &data.vehicle.id));
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!("carlog dashboard {}", data.vehicle.plate),
            ),
        );
    } else {
        println!("status=found");
        println!("id={}", data.vehicle.id);
        println!("plate={}", data.vehicle.plate);
    }
}

// Scanned identifiers often carry the plate, which is what people recognise.
fn not_in_store_message(vehicle_id: &str) -> String {
    match parse_vehicle_id(vehicle_id).and_then(|hints| hints.plate) {
        Some(plate) => format!("Vehicle {} (plate {}) is not in this store", vehicle_id, plate),
        None => format!("Vehicle {} is not in this store", vehicle_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_store_message_names_plate() {
        assert_eq!(
            not_in_store_message("VEH-XYZ9876-FIAT-UNO-2012-lq8x2k1c"),
            "Vehicle VEH-XYZ9876-FIAT-UNO-2012-lq8x2k1c (plate XYZ9876) is not in this store"
        );
        assert_eq!(
            not_in_store_message("VEH-ABC-1234-TOYOTA-COROLLA-2020-lq8x2k1c"),
            "Vehicle VEH-ABC-1234-TOYOTA-COROLLA-2020-lq8x2k1c is not in this store"
        );
    }

    #[test]
    fn test_export_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_str = dir.path().to_str().expect("utf8 path");

        assert_eq!(
            export_destination(None, "vehicle-ABC1234-2024-06-01.json"),
            PathBuf::from("vehicle-ABC1234-2024-06-01.json")
        );
        assert_eq!(
            export_destination(Some(dir_str), "vehicle-ABC1234-2024-06-01.json"),
            dir.path().join("vehicle-ABC1234-2024-06-01.json")
        );
        assert_eq!(
            export_destination(Some("/tmp/out.json"), "ignored.json"),
            PathBuf::from("/tmp/out.json")
        );
    }
}
