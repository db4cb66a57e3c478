//! Alert engine.
//!
//! Alerts are derived from a vehicle's odometer reading and its maintenance
//! history every time they are viewed. Nothing here is persisted except the
//! separate [`DismissedAlerts`] set.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{midnight_utc, Maintenance, Vehicle};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Mileage,
    Time,
    Warranty,
    /// Reserved; no rule emits it
    Recall,
    /// Reserved; no rule emits it
    Custom,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mileage => "mileage",
            Self::Time => "time",
            Self::Warranty => "warranty",
            Self::Recall => "recall",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
}

impl AlertPriority {
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Stable identifier derived from the rule and the source record
    pub id: String,

    #[serde(rename = "type")]
    pub kind: AlertKind,

    pub title: String,

    pub message: String,

    pub priority: AlertPriority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_mileage: Option<u32>,

    #[serde(default)]
    pub dismissed: bool,

    pub created_at: DateTime<Utc>,
}

/// Windows inside which an upcoming due point raises a medium alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub mileage_window_km: u32,
    pub days_window: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            mileage_window_km: 1000,
            days_window: 30,
        }
    }
}

/// Compute alerts with the default thresholds.
pub fn generate_alerts(
    vehicle: &Vehicle,
    maintenances: &[Maintenance],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    generate_alerts_with(&AlertThresholds::default(), vehicle, maintenances, now)
}

/// Compute alerts, highest priority first.
///
/// Rules run mileage, then time, then warranty, each in record order; the
/// final sort is stable so ties keep that order.
pub fn generate_alerts_with(
    thresholds: &AlertThresholds,
    vehicle: &Vehicle,
    maintenances: &[Maintenance],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for maintenance in maintenances {
        if let Some(alert) = mileage_alert(thresholds, vehicle, maintenance, now) {
            alerts.push(alert);
        }
    }

    for maintenance in maintenances {
        if let Some(alert) = time_alert(thresholds, maintenance, now) {
            alerts.push(alert);
        }
    }

    for maintenance in maintenances {
        for part in &maintenance.parts {
            let Some(expires) = part.warranty_expires else {
                continue;
            };
            let days = days_until(expires, now);
            if days < 0 {
                alerts.push(Alert {
                    id: format!("warranty-expired-{}", part.id),
                    kind: AlertKind::Warranty,
                    title: "Warranty expired".to_string(),
                    message: format!("Warranty for part {} expired", part.name),
                    priority: AlertPriority::Low,
                    due_date: Some(expires),
                    due_mileage: None,
                    dismissed: false,
                    created_at: now,
                });
            } else if days <= thresholds.days_window {
                alerts.push(Alert {
                    id: format!("warranty-expiring-{}", part.id),
                    kind: AlertKind::Warranty,
                    title: "Warranty expiring soon".to_string(),
                    message: format!("Warranty for part {} expires in {} days", part.name, days),
                    priority: AlertPriority::Medium,
                    due_date: Some(expires),
                    due_mileage: None,
                    dismissed: false,
                    created_at: now,
                });
            }
        }
    }

    alerts.sort_by_key(|alert| Reverse(alert.priority.rank()));
    alerts
}

fn mileage_alert(
    thresholds: &AlertThresholds,
    vehicle: &Vehicle,
    maintenance: &Maintenance,
    now: DateTime<Utc>,
) -> Option<Alert> {
    let target = maintenance.next_maintenance.as_ref()?.mileage?;
    let remaining = i64::from(target) - i64::from(vehicle.current_mileage);
    let service = &maintenance.service.name;

    if remaining <= 0 {
        Some(Alert {
            id: format!("mileage-overdue-{}", maintenance.id),
            kind: AlertKind::Mileage,
            title: "Maintenance overdue by mileage".to_string(),
            message: format!("{}: {} km overdue", service, remaining.abs()),
            priority: AlertPriority::High,
            due_date: None,
            due_mileage: Some(target),
            dismissed: false,
            created_at: now,
        })
    } else if remaining <= i64::from(thresholds.mileage_window_km) {
        Some(Alert {
            id: format!("mileage-due-{}", maintenance.id),
            kind: AlertKind::Mileage,
            title: "Maintenance due soon by mileage".to_string(),
            message: format!("{}: {} km remaining", service, remaining),
            priority: AlertPriority::Medium,
            due_date: None,
            due_mileage: Some(target),
            dismissed: false,
            created_at: now,
        })
    } else {
        None
    }
}

fn time_alert(
    thresholds: &AlertThresholds,
    maintenance: &Maintenance,
    now: DateTime<Utc>,
) -> Option<Alert> {
    let target = maintenance.next_maintenance.as_ref()?.date?;
    let days = days_until(target, now);
    let service = &maintenance.service.name;

    if days < 0 {
        Some(Alert {
            id: format!("time-overdue-{}", maintenance.id),
            kind: AlertKind::Time,
            title: "Maintenance overdue by date".to_string(),
            message: format!("{}: overdue by {} days", service, days.abs()),
            priority: AlertPriority::High,
            due_date: Some(target),
            due_mileage: None,
            dismissed: false,
            created_at: now,
        })
    } else if days <= thresholds.days_window {
        Some(Alert {
            id: format!("time-due-{}", maintenance.id),
            kind: AlertKind::Time,
            title: "Maintenance due soon by date".to_string(),
            message: format!("{}: due in {} days", service, days),
            priority: AlertPriority::Medium,
            due_date: Some(target),
            due_mileage: None,
            dismissed: false,
            created_at: now,
        })
    } else {
        None
    }
}

/// Whole days from `now` until the start of `date`, rounded toward negative
/// infinity.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let millis = (midnight_utc(date) - now).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY)
}

/// Alerts the dashboard counts as pending: not dismissed, high or medium.
pub fn pending_alerts(alerts: &[Alert]) -> Vec<&Alert> {
    alerts
        .iter()
        .filter(|alert| !alert.dismissed && alert.priority >= AlertPriority::Medium)
        .collect()
}

/// Identifiers of alerts the user dismissed.
///
/// Stored apart from the alerts themselves; because alert identifiers are
/// stable, the set applies to every recomputation over unchanged data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DismissedAlerts {
    ids: BTreeSet<String>,
}

impl DismissedAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the alert was not already dismissed.
    pub fn dismiss(&mut self, alert_id: impl Into<String>) -> bool {
        self.ids.insert(alert_id.into())
    }

    /// Returns `true` if the alert had been dismissed.
    pub fn restore(&mut self, alert_id: &str) -> bool {
        self.ids.remove(alert_id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, alert_id: &str) -> bool {
        self.ids.contains(alert_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Drop dismissed alerts from a freshly computed list.
    pub fn retain_active(&self, mut alerts: Vec<Alert>) -> Vec<Alert> {
        alerts.retain(|alert| !self.contains(&alert.id));
        alerts
    }

    /// Flag dismissed alerts without removing them.
    pub fn annotate(&self, mut alerts: Vec<Alert>) -> Vec<Alert> {
        for alert in &mut alerts {
            alert.dismissed = self.contains(&alert.id);
        }
        alerts
    }
}
