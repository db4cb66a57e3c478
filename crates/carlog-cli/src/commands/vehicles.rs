use carlog_core::dashboard::timeline;
use carlog_core::{FuelType, NewVehicle};

use crate::app::{find_vehicle_id, AppContext};
use crate::cli::{JsonArgs, VehicleAddArgs, VehicleRemoveArgs, VehicleShowArgs};
use crate::errors::CliError;
use crate::helpers::confirm;
use crate::output::{print_json, timeline_row, vehicle_label, vehicle_row};
use crate::ui::format::{format_datetime, format_km};
use crate::ui::{
    badge, blank_line, header, header_with_context, hint, kv, print, receipt, simple_table,
    Badge, Column,
};

const VEHICLE_COLUMNS: [Column; 5] = [
    Column::new("Plate"),
    Column::new("Vehicle"),
    Column::numeric("Year"),
    Column::numeric("Mileage"),
    Column::new("ID"),
];

pub(crate) const TIMELINE_COLUMNS: [Column; 7] = [
    Column::new("Date"),
    Column::new("Service"),
    Column::new("Category"),
    Column::numeric("Mileage"),
    Column::numeric("Cost"),
    Column::new("Status"),
    Column::new("ID"),
];

pub fn handle_add(ctx: &AppContext, args: &VehicleAddArgs) -> anyhow::Result<()> {
    for (flag, value) in [
        ("--plate", &args.plate),
        ("--brand", &args.brand),
        ("--model", &args.model),
    ] {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input(format!("{} cannot be empty", flag)).into());
        }
    }

    let mut new_vehicle = NewVehicle::new(
        args.plate.trim(),
        args.brand.trim(),
        args.model.trim(),
        args.year,
        args.mileage,
    );
    if let Some(color) = args.color.as_deref() {
        new_vehicle = new_vehicle.with_color(color);
    }
    if let Some(chassis) = args.chassis.as_deref() {
        new_vehicle = new_vehicle.with_chassis(chassis);
    }
    if let Some(fuel) = args.fuel.as_deref() {
        new_vehicle = new_vehicle.with_fuel_type(fuel.parse::<FuelType>()?);
    }

    let mut garage = ctx.open_garage()?;
    let plate = new_vehicle.plate.trim().to_uppercase();
    if garage.list_vehicles()?.iter().any(|v| v.plate == plate) {
        tracing::warn!(plate = %plate, "plate already registered");
    }
    let vehicle = garage.add_vehicle(new_vehicle, ctx.now()?)?;

    if args.json {
        return print_json(&vehicle);
    }
    if ctx.quiet() {
        println!("{}", vehicle.id);
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    let label = vehicle_label(&vehicle);
    let mileage = format_km(vehicle.current_mileage, ui_ctx.mode.is_pretty());
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Vehicle added",
            &[
                ("ID", vehicle.id.as_str()),
                ("Plate", vehicle.plate.as_str()),
                ("Vehicle", label.as_str()),
                ("Mileage", mileage.as_str()),
            ],
        ),
    );
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicles = garage.list_vehicles()?;

    if args.json {
        return print_json(&vehicles);
    }
    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();

    if vehicles.is_empty() {
        if pretty && !ctx.quiet() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No vehicles registered"));
            print(
                &ui_ctx,
                &hint(&ui_ctx, "carlog vehicle add --plate ABC1234 --brand Toyota ..."),
            );
        }
        return Ok(());
    }

    if pretty && !ctx.quiet() {
        let count = vehicles.len().to_string();
        let store = ctx.store_path()?.display().to_string();
        print(
            &ui_ctx,
            &header_with_context(&ui_ctx, "vehicles", Some(count.as_str()), Some(store.as_str())),
        );
        blank_line(&ui_ctx);
    }
    let rows: Vec<Vec<String>> = vehicles.iter().map(|v| vehicle_row(v, pretty)).collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &VEHICLE_COLUMNS, &rows));
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &VehicleShowArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;

    if args.json {
        return print_json(&data);
    }
    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();
    let vehicle = &data.vehicle;
    let tz = ctx.timezone();

    print(&ui_ctx, &header(&ui_ctx, "vehicle", Some(vehicle.plate.as_str())));
    let mut fields = vec![
        ("ID", vehicle.id.clone()),
        ("Plate", vehicle.plate.clone()),
        ("Vehicle", vehicle_label(vehicle)),
        ("Mileage", format_km(vehicle.current_mileage, pretty)),
    ];
    if let Some(color) = &vehicle.color {
        fields.push(("Color", color.clone()));
    }
    if let Some(chassis) = &vehicle.chassis {
        fields.push(("Chassis", chassis.clone()));
    }
    if let Some(fuel) = vehicle.fuel_type {
        fields.push(("Fuel", fuel.to_string()));
    }
    fields.push(("Registered", format_datetime(&vehicle.created_at, tz, pretty)));
    fields.push(("Updated", format_datetime(&data.last_updated, tz, pretty)));
    for (key, value) in &fields {
        print(&ui_ctx, &kv(&ui_ctx, key, value));
    }

    blank_line(&ui_ctx);
    if data.maintenances.is_empty() {
        if pretty {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No maintenance logged yet"));
            print(
                &ui_ctx,
                &hint(&ui_ctx, &format!("carlog service add {} ...", vehicle.plate)),
            );
        }
        return Ok(());
    }

    let entries = timeline(&data.maintenances, ctx.now()?);
    let rows: Vec<Vec<String>> = entries.iter().map(|e| timeline_row(e, pretty)).collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &TIMELINE_COLUMNS, &rows));
    Ok(())
}

pub fn handle_remove(ctx: &AppContext, args: &VehicleRemoveArgs) -> anyhow::Result<()> {
    let mut garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let ui_ctx = ctx.ui_context(false);

    if !args.yes {
        let prompt = format!(
            "Remove vehicle {} and all of its maintenance history?",
            args.vehicle.trim()
        );
        if !confirm(&prompt, ui_ctx.is_interactive())? {
            if !ctx.quiet() {
                if ui_ctx.mode.is_pretty() {
                    print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
                } else {
                    println!("status=cancelled");
                }
            }
            return Ok(());
        }
    }

    garage.remove_vehicle(&vehicle_id)?;

    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Vehicle removed", &[("ID", vehicle_id.as_str())]),
        );
    }
    Ok(())
}
