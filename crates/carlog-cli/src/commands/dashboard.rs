use serde_json::json;

use carlog_core::DashboardSummary;

use crate::app::{find_vehicle_id, AppContext};
use crate::cli::DashboardArgs;
use crate::output::{alert_row, next_maintenance_label, print_json, vehicle_label};
use crate::ui::format::{format_date, format_km, format_money};
use crate::ui::theme::BULLET;
use crate::ui::{badge, blank_line, divider, header, kv, print, Badge};

pub fn handle_dashboard(ctx: &AppContext, args: &DashboardArgs) -> anyhow::Result<()> {
    let garage = ctx.open_garage()?;
    let vehicle_id = find_vehicle_id(&garage, &args.vehicle)?;
    let data = garage.require_data(&vehicle_id)?;
    let dismissed = garage.dismissed_alerts(&vehicle_id)?;

    let summary = DashboardSummary::build(
        &data.vehicle,
        &data.maintenances,
        &dismissed,
        &ctx.thresholds()?,
        ctx.now()?,
    );

    if args.json {
        return print_json(&json!({
            "vehicle": data.vehicle,
            "summary": summary,
        }));
    }

    let ui_ctx = ctx.ui_context(false);
    let pretty = ui_ctx.mode.is_pretty();
    let vehicle = &data.vehicle;

    print(&ui_ctx, &header(&ui_ctx, "dashboard", Some(vehicle.plate.as_str())));
    let next = summary
        .next_maintenance
        .as_ref()
        .and_then(|m| m.next_maintenance.as_ref())
        .map(|next| next_maintenance_label(next, pretty))
        .unwrap_or_else(|| "-".to_string());
    let last_service = data
        .maintenances
        .iter()
        .map(|m| m.date)
        .max()
        .map(|date| format_date(&date))
        .unwrap_or_else(|| "-".to_string());

    for (key, value) in [
        ("Vehicle", vehicle_label(vehicle)),
        ("Odometer", format_km(vehicle.current_mileage, pretty)),
        ("Events", summary.maintenance_count.to_string()),
        ("Last service", last_service),
        ("Total spent", format_money(summary.total_cost)),
        ("This month", format_money(summary.cost_this_month)),
        ("Pending alerts", summary.pending_count.to_string()),
        ("Next maintenance", next),
    ] {
        print(&ui_ctx, &kv(&ui_ctx, key, &value));
    }

    if summary.alerts.is_empty() {
        if pretty {
            blank_line(&ui_ctx);
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "No alerts"));
        }
        return Ok(());
    }

    if pretty {
        blank_line(&ui_ctx);
        print(&ui_ctx, &divider(&ui_ctx));
        for alert in &summary.alerts {
            let line = format!(
                "{} {} {}",
                alert.title,
                BULLET.get(ui_ctx.unicode),
                alert.message
            );
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::for_priority(alert.priority), &line),
            );
        }
    } else {
        for alert in &summary.alerts {
            println!("alert={}", alert_row(alert, false).join("\t"));
        }
    }
    Ok(())
}
