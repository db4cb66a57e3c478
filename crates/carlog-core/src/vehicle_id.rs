//! Vehicle identifier scheme.
//!
//! Identifiers look like `VEH-ABC-1234-TOYOTA-COROLLA-2020-lq8x2k1c`: a fixed
//! prefix, the descriptive fields, and the creation instant in base 36.
//! Generation is time-dependent, so an identifier must be minted once and
//! stored; it is never re-derived from the descriptive fields.

use chrono::{DateTime, Utc};

/// Prefix shared by every vehicle identifier.
pub const VEHICLE_ID_PREFIX: &str = "VEH-";

const MIN_ID_LEN: usize = 10;

/// Mint a new vehicle identifier.
pub fn generate_vehicle_id(
    plate: &str,
    brand: &str,
    model: &str,
    year: u16,
    now: DateTime<Utc>,
) -> String {
    let base = format!("{}-{}-{}-{}", plate, brand, model, year).to_uppercase();
    let normalized = base.split_whitespace().collect::<Vec<_>>().join("-");
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    format!("{}{}-{}", VEHICLE_ID_PREFIX, normalized, to_base36(millis))
}

/// Format check only; says nothing about whether the vehicle exists.
pub fn is_valid_vehicle_id(id: &str) -> bool {
    id.starts_with(VEHICLE_ID_PREFIX) && id.chars().count() > MIN_ID_LEN
}

/// Descriptive hints recovered from an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleIdHints {
    pub plate: Option<String>,
}

/// Best-effort extraction of descriptive fields from an identifier.
///
/// Only a 7-character plate segment is recognised; anything else is
/// ambiguous once whitespace has been folded into dashes.
pub fn parse_vehicle_id(id: &str) -> Option<VehicleIdHints> {
    if !is_valid_vehicle_id(id) {
        return None;
    }

    let segments: Vec<&str> = id.split('-').collect();
    if segments.len() < 3 {
        return None;
    }

    let plate = segments
        .get(1)
        .filter(|segment| segment.chars().count() == 7)
        .map(|segment| segment.to_string());
    Some(VehicleIdHints { plate })
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
