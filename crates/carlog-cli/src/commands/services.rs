use carlog_core::dashboard::timeline;
use carlog_core::{Costs, Mechanic, NewMaintenance, NextMaintenance, ServiceCategory};

use crate::app::{find_vehicle_id, AppContext};
use crate::cli::{ServiceAddArgs, ServiceListArgs, ServiceRemoveArgs};
use crate::errors::CliError;
use crate::helpers::{parse_date, parse_part_spec};
use crate::output::{print_json, short_id, timeline_row};
use crate::ui::format::{format_date, format_km, format_money};
use crate::ui::{badge, print, receipt, simple_table, Badge};

use super::vehicles::TIMELINE_COLUMNS;

pub fn handle_add(ctx: &AppContext, args: &ServiceAddArgs) -> anyhow::Result<()> {
    let now = ctx.now()?;
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => now.date_naive(),
    };
    let category = args.category.parse::<ServiceCategory>()?;
    let costs = build_costs(args)?;

    if args.name.trim().is_empty() {
        return Err(CliError::invalid_input("--name cannot be empty").into());
    }
    let mechanic = Mechanic {
        name: args.mechanic.trim().to_string(),
        workshop: args.workshop.clone(),
        location: args.location.trim().to_string(),
        contact: args.contact.clone(),
    };

    let mut new_maintenance = NewMaintenance::new(
        date,
        args.mileage,
        args.name.trim(),
        category,
        mechanic,
        costs,
    );
    for spec in &args.parts {
        new_maintenance = new_maintenance.with_part(parse_part_spec(spec)?);
    }
    if let Some(description) = args.description.as_deref() {
        new_maintenance = new_maintenance.with_description(description);
    }
    if args.next_km.is_some() || args.next_date.is_some() || args.next_label.is_some() {
        let next_date = match args.next_date.as_deref() {
            Some(value) => Some(parse_date(value)?),
            None => None,
        };
        new_maintenance = new_maintenance.with_next(NextMaintenance {
            mileage: args.next_km,
            date: next_date,
            label: args
                .next_label
                .clone()
                .unwrap_or_else(|| args.name.trim().to_string()),
        });
    }

    let mut garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let odometer_before = garage.require_data(&vehicle_id)?.vehicle.current_mileage;

    let maintenance = new_maintenance.into_maintenance();
    let data = garage.add_maintenance(&vehicle_id, maintenance.clone(), now)?;

    if args.json {
        return print_json(&maintenance);
    }
    if ctx.quiet() {
        println!("{}", maintenance.id);
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();
    let date_text = format_date(&maintenance.date);
    let mileage_text = format_km(maintenance.mileage, pretty);
    let total_text = format_money(maintenance.costs.total);
    let parts_text = maintenance.parts.len().to_string();
    let mut items = vec![
        ("ID", maintenance.id.as_str()),
        ("Service", maintenance.service.name.as_str()),
        ("Date", date_text.as_str()),
        ("Mileage", mileage_text.as_str()),
        ("Total", total_text.as_str()),
        ("Parts", parts_text.as_str()),
    ];
    let odometer_text = format_km(data.vehicle.current_mileage, pretty);
    if data.vehicle.current_mileage != odometer_before {
        items.push(("Odometer", odometer_text.as_str()));
    }
    print(&ui_ctx, &receipt(&ui_ctx, "Maintenance logged", &items));
    Ok(())
}

fn build_costs(args: &ServiceAddArgs) -> anyhow::Result<Costs> {
    let amounts = [
        ("--total", Some(args.total)),
        ("--labor", args.labor),
        ("--parts-cost", args.parts_cost),
        ("--other-cost", args.other_cost),
    ];
    for (flag, amount) in amounts {
        if let Some(value) = amount {
            if !value.is_finite() || value < 0.0 {
                return Err(CliError::invalid_input(format!(
                    "{} must be a non-negative amount, got {}",
                    flag, value
                ))
                .into());
            }
        }
    }

    let mut costs = Costs::total(args.total);
    costs.labor = args.labor;
    costs.parts = args.parts_cost;
    costs.other = args.other_cost;
    Ok(costs)
}

pub fn handle_list(ctx: &AppContext, args: &ServiceListArgs) -> anyhow::Result<()> {
    let category = args
        .category
        .as_deref()
        .map(str::parse::<ServiceCategory>)
        .transpose()?;

    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;

    let entries: Vec<_> = timeline(&data.maintenances, ctx.now()?)
        .into_iter()
        .filter(|entry| category.map_or(true, |c| entry.maintenance.service.category == c))
        .collect();

    if args.json {
        return print_json(&entries);
    }
    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();
    if entries.is_empty() {
        if pretty && !ctx.quiet() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No maintenance events"));
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries.iter().map(|e| timeline_row(e, pretty)).collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &TIMELINE_COLUMNS, &rows));
    Ok(())
}

pub fn handle_remove(ctx: &AppContext, args: &ServiceRemoveArgs) -> anyhow::Result<()> {
    let mut garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;

    let prefix = args.id.trim();
    let matches: Vec<&str> = data
        .maintenances
        .iter()
        .map(|m| m.id.as_str())
        .filter(|id| !prefix.is_empty() && id.starts_with(prefix))
        .collect();
    let maintenance_id = match matches.as_slice() {
        [] => {
            return Err(CliError::not_found(
                format!("Maintenance '{}' not found", prefix),
                format!("Hint: Run `carlog service list {}` to see event IDs.", args.vehicle),
            )
            .into())
        }
        [id] => id.to_string(),
        _ => {
            return Err(CliError::invalid_input(format!(
                "Maintenance ID prefix '{}' is ambiguous ({} matches)\nHint: Use more characters of the ID.",
                prefix,
                matches.len()
            ))
            .into())
        }
    };

    garage.remove_maintenance(&vehicle_id, &maintenance_id, ctx.now()?)?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let display_id = if ui_ctx.mode.is_pretty() {
            short_id(&maintenance_id)
        } else {
            maintenance_id.clone()
        };
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Maintenance removed", &[("ID", display_id.as_str())]),
        );
    }
    Ok(())
}
