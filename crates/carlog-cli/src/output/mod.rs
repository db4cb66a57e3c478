//! Output formatting helpers for the CLI.
//!
//! JSON emission plus the row and label builders shared by the listing
//! commands.

use serde::Serialize;

use carlog_core::dashboard::TimelineEntry;
use carlog_core::{Alert, NextMaintenance, Vehicle};

use crate::ui::format::{format_date, format_km, format_money, single_line, truncate};

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("Failed to encode JSON output: {}", e))?;
    println!("{}", text);
    Ok(())
}

/// "Toyota Corolla 2020"
pub fn vehicle_label(vehicle: &Vehicle) -> String {
    format!("{} {} {}", vehicle.brand, vehicle.model, vehicle.year)
}

pub fn vehicle_row(vehicle: &Vehicle, pretty: bool) -> Vec<String> {
    vec![
        vehicle.plate.clone(),
        format!("{} {}", vehicle.brand, vehicle.model),
        vehicle.year.to_string(),
        format_km(vehicle.current_mileage, pretty),
        vehicle.id.clone(),
    ]
}

/// First 8 characters of a maintenance identifier.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn timeline_row(entry: &TimelineEntry<'_>, pretty: bool) -> Vec<String> {
    let m = entry.maintenance;
    let name = if pretty {
        truncate(&single_line(&m.service.name), 32)
    } else {
        single_line(&m.service.name)
    };
    vec![
        format_date(&m.date),
        name,
        m.service.category.to_string(),
        format_km(m.mileage, pretty),
        format_money(m.costs.total),
        entry.status.as_str().to_string(),
        if pretty { short_id(&m.id) } else { m.id.clone() },
    ]
}

pub fn alert_row(alert: &Alert, pretty: bool) -> Vec<String> {
    let due = match (alert.due_date, alert.due_mileage) {
        (Some(date), _) => format_date(&date),
        (None, Some(km)) => format_km(km, pretty),
        (None, None) => "-".to_string(),
    };
    vec![
        alert.priority.as_str().to_string(),
        alert.kind.as_str().to_string(),
        single_line(&alert.title),
        due,
        alert.id.clone(),
    ]
}

/// "Oil change at 90,000 km or on 2024-09-10"
pub fn next_maintenance_label(next: &NextMaintenance, pretty: bool) -> String {
    let mut targets = Vec::new();
    if let Some(km) = next.mileage {
        targets.push(format!("at {}", format_km(km, pretty)));
    }
    if let Some(date) = next.date {
        targets.push(format!("on {}", format_date(&date)));
    }
    let label = if next.label.trim().is_empty() {
        "Next maintenance"
    } else {
        next.label.as_str()
    };
    if targets.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", label, targets.join(" or "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("7a2e3c0b-1234-5678-9abc-def012345678"), "7a2e3c0b");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_next_maintenance_label() {
        let next = NextMaintenance {
            mileage: Some(90_000),
            date: NaiveDate::from_ymd_opt(2024, 9, 10),
            label: "Oil change".to_string(),
        };
        assert_eq!(
            next_maintenance_label(&next, true),
            "Oil change at 90,000 km or on 2024-09-10"
        );

        let bare = NextMaintenance {
            mileage: None,
            date: None,
            label: String::new(),
        };
        assert_eq!(next_maintenance_label(&bare, false), "Next maintenance");
    }
}
