use carlog_core::generate_alerts_with;

use crate::app::{find_vehicle_id, AppContext};
use crate::cli::{AlertsDismissArgs, AlertsListArgs, AlertsRestoreArgs};
use crate::errors::CliError;
use crate::output::{alert_row, print_json};
use crate::ui::{badge, print, receipt, table, Badge, Column};

const ALERT_COLUMNS: [Column; 6] = [
    Column::new("Priority"),
    Column::new("Type"),
    Column::new("Title"),
    Column::new("Due"),
    Column::new("ID"),
    Column::new("State"),
];

pub fn handle_list(ctx: &AppContext, args: &AlertsListArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;
    let dismissed = garage.dismissed_alerts(&vehicle_id)?;

    let computed = generate_alerts_with(
        &ctx.thresholds()?,
        &data.vehicle,
        &data.maintenances,
        ctx.now()?,
    );
    let alerts = if args.all {
        dismissed.annotate(computed)
    } else {
        dismissed.retain_active(computed)
    };

    if args.json {
        return print_json(&alerts);
    }
    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();
    if alerts.is_empty() {
        if pretty && !ctx.quiet() {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "No alerts"));
        }
        return Ok(());
    }

    let columns = if args.all {
        &ALERT_COLUMNS[..]
    } else {
        &ALERT_COLUMNS[..5]
    };
    let rows: Vec<Vec<String>> = alerts
        .iter()
        .map(|alert| {
            let mut row = alert_row(alert, pretty);
            if args.all {
                let state = if alert.dismissed { "dismissed" } else { "active" };
                row.push(state.to_string());
            }
            row
        })
        .collect();
    print(&ui_ctx, &table(&ui_ctx, columns, &rows));
    Ok(())
}

pub fn handle_dismiss(ctx: &AppContext, args: &AlertsDismissArgs) -> anyhow::Result<()> {
    let mut garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;

    let alert_id = args.alert.trim();
    let computed = generate_alerts_with(
        &ctx.thresholds()?,
        &data.vehicle,
        &data.maintenances,
        ctx.now()?,
    );
    if !computed.iter().any(|alert| alert.id == alert_id) {
        return Err(CliError::not_found(
            format!("Alert '{}' not found", alert_id),
            format!(
                "Hint: Run `carlog alerts list {}` to see current alerts.",
                args.vehicle
            ),
        )
        .into());
    }

    let mut dismissed = garage.dismissed_alerts(&vehicle_id)?;
    let changed = dismissed.dismiss(alert_id);
    if changed {
        garage.save_dismissed_alerts(&vehicle_id, &dismissed)?;
    }

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let title = if changed {
            "Alert dismissed"
        } else {
            "Alert already dismissed"
        };
        print(&ui_ctx, &receipt(&ui_ctx, title, &[("ID", alert_id)]));
    }
    Ok(())
}

pub fn handle_restore(ctx: &AppContext, args: &AlertsRestoreArgs) -> anyhow::Result<()> {
    let mut garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let mut dismissed = garage.dismissed_alerts(&vehicle_id)?;

    let restored = match args.alert.as_deref().map(str::trim) {
        Some(alert_id) if !args.all => {
            if !dismissed.restore(alert_id) {
                return Err(CliError::not_found(
                    format!("Alert '{}' is not dismissed", alert_id),
                    format!(
                        "Hint: Run `carlog alerts list {} --all` to see dismissed alerts.",
                        args.vehicle
                    ),
                )
                .into());
            }
            1
        }
        _ => {
            let count = dismissed.len();
            dismissed.clear();
            count
        }
    };
    garage.save_dismissed_alerts(&vehicle_id, &dismissed)?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let count = restored.to_string();
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Alerts restored", &[("Restored", count.as_str())]),
        );
    }
    Ok(())
}
