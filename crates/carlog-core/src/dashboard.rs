//! Per-vehicle summary figures and the history timeline.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::alerts::{generate_alerts_with, pending_alerts, Alert, AlertThresholds, DismissedAlerts};
use crate::model::{midnight_utc, Maintenance, Vehicle};

/// What the dashboard shows for one vehicle at `now`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Computed alerts minus the dismissed ones, highest priority first
    pub alerts: Vec<Alert>,
    /// High and medium alerts among `alerts`
    pub pending_count: usize,
    pub cost_this_month: f64,
    pub total_cost: f64,
    pub maintenance_count: usize,
    /// Event whose next-maintenance hint comes soonest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_maintenance: Option<Maintenance>,
}

impl DashboardSummary {
    pub fn build(
        vehicle: &Vehicle,
        maintenances: &[Maintenance],
        dismissed: &DismissedAlerts,
        thresholds: &AlertThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        let alerts =
            dismissed.retain_active(generate_alerts_with(thresholds, vehicle, maintenances, now));
        let pending_count = pending_alerts(&alerts).len();

        Self {
            pending_count,
            alerts,
            cost_this_month: cost_this_month(maintenances, now),
            total_cost: maintenances.iter().map(|m| m.costs.total).sum(),
            maintenance_count: maintenances.len(),
            next_maintenance: next_maintenance(maintenances).cloned(),
        }
    }
}

/// Sum of totals for events in the same UTC calendar month as `now`.
pub fn cost_this_month(maintenances: &[Maintenance], now: DateTime<Utc>) -> f64 {
    let today = now.date_naive();
    maintenances
        .iter()
        .filter(|m| m.date.year() == today.year() && m.date.month() == today.month())
        .map(|m| m.costs.total)
        .sum()
}

/// The event with the soonest hint.
///
/// Date targets come first (earliest date wins), then mileage-only targets
/// (lowest mileage wins). Events without a usable hint are skipped.
pub fn next_maintenance(maintenances: &[Maintenance]) -> Option<&Maintenance> {
    let by_date = maintenances
        .iter()
        .filter_map(|m| Some((m.next_maintenance.as_ref()?.date?, m)))
        .min_by_key(|(date, _)| *date)
        .map(|(_, m)| m);

    by_date.or_else(|| {
        maintenances
            .iter()
            .filter_map(|m| Some((m.next_maintenance.as_ref()?.mileage?, m)))
            .min_by_key(|(mileage, _)| *mileage)
            .map(|(_, m)| m)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    UnderWarranty,
    Pending,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderWarranty => "under warranty",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry<'a> {
    pub maintenance: &'a Maintenance,
    pub status: MaintenanceStatus,
}

/// Events newest first, each with its display status.
pub fn timeline(maintenances: &[Maintenance], now: DateTime<Utc>) -> Vec<TimelineEntry<'_>> {
    let mut entries: Vec<_> = maintenances
        .iter()
        .map(|maintenance| TimelineEntry {
            maintenance,
            status: status_of(maintenance, now),
        })
        .collect();
    entries.sort_by(|a, b| b.maintenance.date.cmp(&a.maintenance.date));
    entries
}

fn status_of(maintenance: &Maintenance, now: DateTime<Utc>) -> MaintenanceStatus {
    if maintenance.has_active_warranty(now) {
        return MaintenanceStatus::UnderWarranty;
    }
    let overdue = maintenance
        .next_maintenance
        .as_ref()
        .and_then(|next| next.date)
        .map(|date| midnight_utc(date) < now)
        .unwrap_or(false);
    if overdue {
        MaintenanceStatus::Pending
    } else {
        MaintenanceStatus::Completed
    }
}
